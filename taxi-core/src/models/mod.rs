mod assignment;
mod car;
mod driver;
mod manufacturer;
mod session;
mod summary;

pub use assignment::*;
pub use car::*;
pub use driver::*;
pub use manufacturer::*;
pub use session::*;
pub use summary::*;

/// A persisted entity with its own detail page.
pub trait Resource {
    /// Plural path segment, e.g. `drivers`.
    const PLURAL: &'static str;

    fn id(&self) -> i64;

    /// `/<plural>/<id>/`
    fn resource_path(&self) -> String {
        resource_path(Self::PLURAL, self.id())
    }

    fn list_path() -> String {
        format!("/{}/", Self::PLURAL)
    }
}

pub fn resource_path(plural: &str, id: i64) -> String {
    format!("/{}/{}/", plural, id)
}
