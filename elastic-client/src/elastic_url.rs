#[derive(Debug, Clone)]
pub struct ElasticURL(String);

impl AsRef<str> for ElasticURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ElasticURL {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_path_normalizes_slashes() {
        let url = ElasticURL::new("http://elasticsearch:9200/");
        assert_eq!(
            url.append_path("/resumes/_search").as_ref(),
            "http://elasticsearch:9200/resumes/_search"
        );

        let url = ElasticURL::new("http://localhost:9200");
        assert_eq!(url.append_path("resumes").as_ref(), "http://localhost:9200/resumes");
    }
}
