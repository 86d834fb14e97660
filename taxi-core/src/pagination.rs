use std::collections::HashMap;

use serde::Serialize;

use crate::error::{EntityKind, Error, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Number(u32),
    Last,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::Number(1)
    }
}

impl PageRequest {
    pub fn first() -> Self {
        Self::default()
    }

    /// Reads the `page` query parameter. Absent or empty means the first
    /// page; anything other than a positive integer or `last` is not found.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        match params.get("page").map(|raw| raw.trim()) {
            None | Some("") => Ok(Self::first()),
            Some("last") => Ok(Self::Last),
            Some(raw) => match raw.parse::<u32>() {
                Ok(number) if number > 0 => Ok(Self::Number(number)),
                _ => Err(Error::not_found(EntityKind::Page, raw)),
            },
        }
    }

    /// Turns the request into a concrete window over `total` rows.
    pub fn window(&self, total: u64, per_page: u32) -> Result<PageWindow> {
        let per_page = per_page.max(1);
        let num_pages = total.div_ceil(u64::from(per_page)).max(1);
        let number = match *self {
            Self::Last => num_pages,
            Self::Number(number) => u64::from(number),
        };
        if number == 0 || number > num_pages {
            return Err(Error::not_found(EntityKind::Page, number));
        }

        Ok(PageWindow {
            number,
            num_pages,
            per_page,
            total,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u32,
    pub total: u64,
}

impl PageWindow {
    pub fn offset(&self) -> u64 {
        (self.number - 1) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u32 {
        self.per_page
    }

    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            per_page: self.per_page,
            total: self.total,
            has_next: self.number < self.num_pages,
            has_previous: self.number > 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u32,
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_param(value: &str) -> HashMap<String, String> {
        HashMap::from([("page".to_string(), value.to_string())])
    }

    #[test]
    fn parses_page_parameter() {
        assert_eq!(PageRequest::from_params(&HashMap::new()).unwrap(), PageRequest::Number(1));
        assert_eq!(PageRequest::from_params(&page_param("")).unwrap(), PageRequest::Number(1));
        assert_eq!(PageRequest::from_params(&page_param("3")).unwrap(), PageRequest::Number(3));
        assert_eq!(PageRequest::from_params(&page_param("last")).unwrap(), PageRequest::Last);
    }

    #[test]
    fn malformed_page_is_not_found() {
        for raw in ["0", "-1", "abc", "1.5"] {
            assert!(PageRequest::from_params(&page_param(raw)).unwrap_err().is_not_found());
        }
    }

    #[test]
    fn window_arithmetic() {
        let window = PageRequest::Number(2).window(11, 5).unwrap();
        assert_eq!(window.num_pages, 3);
        assert_eq!(window.offset(), 5);

        let last = PageRequest::Last.window(11, 5).unwrap();
        assert_eq!(last.number, 3);

        let page = last.into_page(vec!["k"]);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn empty_set_has_one_page() {
        let window = PageRequest::first().window(0, 5).unwrap();
        assert_eq!(window.num_pages, 1);
        assert_eq!(window.offset(), 0);
        assert!(PageRequest::Number(2).window(0, 5).is_err());
    }

    #[test]
    fn out_of_range_is_not_found() {
        assert!(PageRequest::Number(3).window(10, 5).unwrap_err().is_not_found());
    }
}
