//! # Constants
//!
//! Wire-level keys, HTTP status codes and pointer prefixes shared by the
//! hydrator, the error types and the pagination helpers.

/// HTTP status codes emitted by this crate
pub mod http_status {
    pub const BAD_REQUEST: u16 = 400;
    pub const UNPROCESSABLE_ENTITY: u16 = 422;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}

/// JSON pointers into a request document
pub mod pointers {
    use std::borrow::Cow;

    pub const ROOT: &str = "";
    pub const DATA: &str = "/data";
    pub const DATA_ID: &str = "/data/id";
    pub const DATA_TYPE: &str = "/data/type";
    pub const ATTRIBUTES: &str = "/data/attributes";
    pub const RELATIONSHIPS: &str = "/data/relationships";

    /// Escape one reference token (RFC 6901): `~` becomes `~0`, `/` becomes `~1`
    pub fn escape_segment(segment: &str) -> Cow<'_, str> {
        if segment.contains(['~', '/']) {
            Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
        } else {
            Cow::Borrowed(segment)
        }
    }

    /// Path of an embedded object below `parent`, built from escaped segments
    pub fn nested_path(parent: Option<&str>, mapped_name: &str) -> String {
        let name = escape_segment(mapped_name);
        match parent {
            Some(parent) => format!("{parent}/{name}"),
            None => name.into_owned(),
        }
    }

    /// Pointer to an attribute, optionally nested under an embedded object.
    ///
    /// `root` is an already escaped path as produced by [`nested_path`].
    pub fn attribute(root: Option<&str>, mapped_name: &str) -> String {
        let name = escape_segment(mapped_name);
        match root {
            Some(root) => format!("{ATTRIBUTES}/{root}/{name}"),
            None => format!("{ATTRIBUTES}/{name}"),
        }
    }

    /// Pointer to a has-one relationship identifier
    pub fn relationship_identifier(mapped_name: &str) -> String {
        format!("{RELATIONSHIPS}/{}/data/id", escape_segment(mapped_name))
    }

    /// Pointer to a has-many relationship identifier list
    pub fn relationship_data(mapped_name: &str) -> String {
        format!("{RELATIONSHIPS}/{}/data", escape_segment(mapped_name))
    }
}

/// Keys written into hydrated records
pub mod record_keys {
    /// Class identity tag carried by every hydrated record
    pub const ENTITY: &str = "entity";
    /// Default key receiving the resource identifier on create
    pub const IDENTIFIER: &str = "id";
}

/// Primitive type names recognized in declared type unions
pub mod type_names {
    pub const STRING: &str = "string";
    pub const INT: &str = "int";
    pub const FLOAT: &str = "float";
    pub const BOOL: &str = "bool";
    pub const ARRAY: &str = "array";
    pub const MIXED_ARRAY: &str = "mixed[]";
    pub const MIXED: &str = "mixed";
    pub const NULL: &str = "null";

    /// Separator between members of a type union
    pub const UNION_SEPARATOR: char = '|';
}

/// Format used for date-time attributes (`2024-01-31T12:00:00+00:00`)
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Link member names
pub mod links {
    pub const SELF: &str = "self";
    pub const RELATED: &str = "related";
    pub const FIRST: &str = "first";
    pub const LAST: &str = "last";
    pub const NEXT: &str = "next";
    pub const PREV: &str = "prev";
}
