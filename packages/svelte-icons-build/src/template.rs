use std::{fmt, fs, io, path::Path};

use log::debug;

use crate::{Error, Result};

/// A template split into lines, each line keeping its own terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    lines: Vec<String>,
    substitution_index: Option<usize>,
}

impl Template {
    pub fn load(path: &Path, marker: &str) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => Error::MissingTemplate {
                path: path.to_path_buf(),
            },
            _ => Error::ReadTemplate {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let template = Self::parse(&text, marker);
        match template.substitution_index {
            Some(index) => debug!(
                "loaded {} ({} lines, marker on line {})",
                path.display(),
                template.lines.len(),
                index + 1
            ),
            None => debug!(
                "loaded {} ({} lines, no line contains {marker:?})",
                path.display(),
                template.lines.len()
            ),
        }
        Ok(template)
    }

    /// The substitution point is the first line containing `marker`.
    pub fn parse(text: &str, marker: &str) -> Self {
        let lines: Vec<String> = text.split_inclusive('\n').map(str::to_owned).collect();
        let substitution_index = lines.iter().position(|line| line.contains(marker));
        Self {
            lines,
            substitution_index,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn substitution_index(&self) -> Option<usize> {
        self.substitution_index
    }

    /// Copies every line verbatim except the substitution point, which becomes
    /// `replacement` followed by the replaced line's terminator.
    pub fn render(&self, replacement: &str) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(String::len).sum::<usize>());
        for (index, line) in self.lines.iter().enumerate() {
            if Some(index) == self.substitution_index {
                out.push_str(replacement);
                out.push_str(terminator(line));
            } else {
                out.push_str(line);
            }
        }
        out
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str(line)?;
        }
        Ok(())
    }
}

fn terminator(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "<script>\n\timport Icon from './Icon.svelte';\n\tconst iconUrl = 'placeholder';\n</script>\n<Icon src={iconUrl} />\n";

    #[test]
    fn finds_marker_line() {
        let template = Template::parse(TEMPLATE, "const iconUrl");
        assert_eq!(template.lines().len(), 5);
        assert_eq!(template.substitution_index(), Some(2));
    }

    #[test]
    fn first_marker_line_wins() {
        let template = Template::parse("a\nconst iconUrl = 1\nconst iconUrl = 2\n", "const iconUrl");
        assert_eq!(template.substitution_index(), Some(1));
    }

    #[test]
    fn render_replaces_only_marker_line() {
        let template = Template::parse(TEMPLATE, "const iconUrl");
        let rendered = template.render("REPLACED");
        let original: Vec<&str> = TEMPLATE.split_inclusive('\n').collect();
        let lines: Vec<&str> = rendered.split_inclusive('\n').collect();
        assert_eq!(lines.len(), original.len());
        for (index, (line, orig)) in lines.iter().zip(&original).enumerate() {
            if index == 2 {
                assert_eq!(*line, "REPLACED\n");
            } else {
                assert_eq!(line, orig);
            }
        }
    }

    #[test]
    fn render_without_marker_is_verbatim() {
        let template = Template::parse(TEMPLATE, "const missingMarker");
        assert_eq!(template.substitution_index(), None);
        assert_eq!(template.render("REPLACED"), TEMPLATE);
    }

    #[test]
    fn render_keeps_line_terminators() {
        let text = "one\r\nconst iconUrl\r\nthree";
        let template = Template::parse(text, "const iconUrl");
        assert_eq!(template.render("two"), "one\r\ntwo\r\nthree");

        let unterminated = Template::parse("one\nconst iconUrl", "const iconUrl");
        assert_eq!(unterminated.render("two"), "one\ntwo");
    }

    #[test]
    fn display_echoes_template() {
        let template = Template::parse(TEMPLATE, "const iconUrl");
        assert_eq!(template.to_string(), TEMPLATE);
    }

    #[test]
    fn load_reports_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let err = Template::load(&dir.path().join("nope.svelte"), "const iconUrl").unwrap_err();
        assert!(matches!(err, Error::MissingTemplate { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Icons-Template.svelte");
        fs::write(&path, TEMPLATE).unwrap();
        let template = Template::load(&path, "const iconUrl").unwrap();
        assert_eq!(template.substitution_index(), Some(2));
        assert_eq!(template.to_string(), TEMPLATE);
    }

    #[test]
    fn load_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Icons-Template.svelte");
        fs::write(&path, [0x3c, 0xff, 0xfe, 0x0a]).unwrap();
        let err = Template::load(&path, "const iconUrl").unwrap_err();
        assert!(matches!(err, Error::ReadTemplate { .. }));
    }
}
