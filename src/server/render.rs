//! HTML rendering of an [`AggregationResult`]

use crate::image::BUILD_NAME_VAR;
use crate::model::{AggregatedImage, AggregationResult, Message, ResolvedTag};
use std::fmt::Write;

const STYLE: &str = "\
body{font-family:sans-serif;margin:2rem;color:#222}\
h1 small{color:#777;font-weight:normal}\
.alert{padding:.5rem 1rem;margin:.25rem 0;border-radius:4px}\
.alert-danger{background:#f8d7da}.alert-info{background:#d1ecf1}\
section{margin:1.5rem 0}\
table{border-collapse:collapse;width:100%}\
th,td{text-align:left;padding:.3rem .6rem;border-bottom:1px solid #ddd;vertical-align:top}\
code{font-size:.9em}.muted{color:#888}";

/// Escape text for use in element content and quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Host part of the registry identity, as used in `docker pull` references
fn pull_host(registry: &str) -> &str {
    registry
        .split_once("://")
        .map_or(registry, |(_, rest)| rest)
        .trim_end_matches('/')
}

pub fn render_page(result: &AggregationResult) -> String {
    let registry = escape(&result.registry);
    let mut page = String::new();

    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{registry}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{registry} <small>{count} repositories</small></h1>\n",
        count = result.images.len(),
    );

    for message in &result.messages {
        render_message(&mut page, message);
    }

    if result.images.is_empty() {
        page.push_str("<p class=\"muted\">No repositories found.</p>\n");
    }

    for image in &result.images {
        render_image(&mut page, pull_host(&result.registry), image);
    }

    page.push_str("</body>\n</html>\n");
    page
}

fn render_message(page: &mut String, message: &Message) {
    let _ = writeln!(
        page,
        "<div class=\"alert alert-{}\" role=\"alert\">{}</div>",
        message.level.as_str(),
        escape(&message.message)
    );
}

fn render_image(page: &mut String, host: &str, image: &AggregatedImage) {
    let name = escape(&image.name);
    let _ = writeln!(page, "<section id=\"{name}\">\n<h2>{name}</h2>");

    if image.tags.is_empty() {
        page.push_str("<p class=\"muted\">No tags.</p>\n</section>\n");
        return;
    }

    page.push_str(
        "<table>\n<tr><th>Tag</th><th>Commit</th><th>Date</th><th>Author</th>\
         <th>Message</th><th>Base image</th><th></th></tr>\n",
    );
    for tag in &image.tags {
        render_tag(page, host, &image.name, tag);
    }
    page.push_str("</table>\n</section>\n");
}

fn render_tag(page: &mut String, host: &str, repository: &str, tag: &ResolvedTag) {
    let provenance = &tag.provenance;
    let pull = escape(&format!("docker pull {}/{}:{}", host, repository, tag.name));
    let build = match provenance.env_var(BUILD_NAME_VAR) {
        "" => String::new(),
        name => format!("<br><span class=\"muted\">build {}</span>", escape(name)),
    };

    let commit = if provenance.sha.is_empty() {
        String::new()
    } else if provenance.repository.starts_with("http") {
        let source = provenance.repository.trim_end_matches(".git");
        format!(
            "<a href=\"{}/commit/{}\"><code>{}</code></a> {}",
            escape(source),
            escape(&provenance.sha),
            escape(provenance.short_sha()),
            escape(&provenance.reference)
        )
    } else {
        format!(
            "<code>{}</code> {}",
            escape(provenance.short_sha()),
            escape(&provenance.reference)
        )
    };

    let delete = match &tag.digest {
        Some(digest) => format!(
            "<form method=\"post\" action=\"/delete\">\
             <input type=\"hidden\" name=\"Image\" value=\"{}\">\
             <input type=\"hidden\" name=\"DockerContentDigest\" value=\"{}\">\
             <button type=\"submit\">Delete</button></form>",
            escape(repository),
            escape(digest)
        ),
        None => "<span class=\"muted\">no digest</span>".to_string(),
    };

    let details = if provenance.is_empty() {
        "<td colspan=\"5\" class=\"muted\">no build metadata</td>".to_string()
    } else {
        format!(
            "<td>{commit}</td><td>{date}</td><td>{author}</td><td>{message}</td><td>{base}</td>",
            date = escape(&provenance.date),
            author = escape(&provenance.author),
            message = escape(&provenance.message),
            base = escape(&provenance.base_image),
        )
    };

    let _ = writeln!(
        page,
        "<tr><td><strong>{name}</strong> <span class=\"muted\">{arch}</span><br><code>{pull}</code>{build}</td>\
         {details}<td>{delete}</td></tr>",
        name = escape(&tag.name),
        arch = escape(&tag.architecture),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Provenance;
    use crate::model::Level;

    fn sample() -> AggregationResult {
        AggregationResult {
            registry: "https://registry.local".to_string(),
            images: vec![AggregatedImage {
                name: "team/app".to_string(),
                tags: vec![
                    ResolvedTag {
                        name: "latest".to_string(),
                        architecture: "amd64".to_string(),
                        provenance: Provenance {
                            sha: "0123456789abcdef".to_string(),
                            repository: "https://git.example.com/app.git".to_string(),
                            message: "<b>bold</b> move".to_string(),
                            env: vec!["OPENSHIFT_BUILD_NAME=app-7".to_string()],
                            ..Provenance::default()
                        },
                        digest: Some("sha256:abc".to_string()),
                    },
                    ResolvedTag {
                        name: "v1".to_string(),
                        architecture: String::new(),
                        provenance: Provenance::default(),
                        digest: None,
                    },
                ],
            }],
            messages: vec![Message::new(Level::Danger, "Network error: boom")],
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn page_lists_tags_messages_and_delete_forms() {
        let page = render_page(&sample());

        assert!(page.contains("<div class=\"alert alert-danger\" role=\"alert\">Network error: boom</div>"));
        assert!(page.contains("docker pull registry.local/team/app:latest"));
        assert!(page.contains("https://git.example.com/app/commit/0123456789abcdef"));
        assert!(page.contains("&lt;b&gt;bold&lt;/b&gt; move"));
        assert!(page.contains("name=\"DockerContentDigest\" value=\"sha256:abc\""));
        assert_eq!(page.matches("<form").count(), 1);
        assert!(page.contains("no digest"));
        assert!(page.contains("build app-7"));
        assert_eq!(page.matches("no build metadata").count(), 1);
    }

    #[test]
    fn empty_registry_says_so() {
        let result = AggregationResult {
            registry: "registry.local".to_string(),
            images: Vec::new(),
            messages: Vec::new(),
        };
        assert!(render_page(&result).contains("No repositories found."));
    }
}
