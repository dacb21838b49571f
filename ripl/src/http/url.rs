//! Where templates live on the server.
//!
//! A template with identifier `id` is fetched from `<base_path><id>.<extension>`,
//! e.g. `/static/templates/header.html`.

/// Template URL scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateUrl {
    base_path: String,
    extension: String,
}

impl Default for TemplateUrl {
    fn default() -> Self {
        Self::new("/static/templates/", "html")
    }
}

impl TemplateUrl {
    /// Create a URL scheme. The base path always starts and ends with `/`,
    /// and the extension is stored without its leading dot.
    pub fn new(base_path: &str, extension: &str) -> Self {
        let trimmed = base_path.trim_matches('/');

        let base_path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", trimmed)
        };

        Self {
            base_path,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// URL path of the template.
    pub fn url(&self, id: &str) -> String {
        if self.extension.is_empty() {
            format!("{}{}", self.base_path, id)
        } else {
            format!("{}{}.{}", self.base_path, id, self.extension)
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_url() {
        let url = TemplateUrl::default();
        assert_eq!(url.url("header"), "/static/templates/header.html");
        assert_eq!(url.url("partials/row"), "/static/templates/partials/row.html");
    }

    #[test]
    fn test_normalized() {
        let url = TemplateUrl::new("views", ".hbs");
        assert_eq!(url.base_path(), "/views/");
        assert_eq!(url.extension(), "hbs");
        assert_eq!(url.url("index"), "/views/index.hbs");

        let url = TemplateUrl::new("", "");
        assert_eq!(url.url("index"), "/index");
    }
}
