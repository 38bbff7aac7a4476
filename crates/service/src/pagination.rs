//! Pagination parameters for list endpoints (`GET /jobs?page=&size=`).

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub size: u32,
}

impl Pagination {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Clamp to sane defaults; returns the backend's 0-based page index and the size.
    pub fn normalize(self) -> (u32, u32) {
        let page = if self.page == 0 { 1 } else { self.page };
        let size = self.size.clamp(1, 100);
        (page - 1, size)
    }

    /// Query pairs for the backend.
    pub fn to_query(self) -> [(&'static str, String); 2] {
        let (index, size) = self.normalize();
        [("page", index.to_string()), ("size", size.to_string())]
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, size: 20 } }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, size) = Pagination { page: 0, size: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(size, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, size) = Pagination { page: 5, size: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(size, 100);
    }

    #[test]
    fn query_uses_zero_based_page() {
        let q = Pagination::default().to_query();
        assert_eq!(q[0], ("page", "0".to_string()));
        assert_eq!(q[1], ("size", "20".to_string()));
    }
}
