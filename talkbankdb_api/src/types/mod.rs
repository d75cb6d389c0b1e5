mod credentials;
pub use self::credentials::Credentials;

mod filters;
pub use self::filters::{
    AgeRange, CqlFreq, CqlToken, CqlType, DesignType, Gender, Media, NgramSpec, NgramType,
};

mod path_tree;
pub use self::path_tree::{PathNode, PathTree};

mod table;
pub use self::table::ResultTable;
pub(crate) use self::table::service_message;
