mod operation;
pub(crate) use self::operation::PATH_TREES_ROUTE;
pub use self::operation::Operation;

mod spec;
pub use self::spec::QuerySpec;
