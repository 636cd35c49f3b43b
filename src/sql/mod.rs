//! SQL file access
//!
//! Scripts and queries live as plain `.sql` files under the SQL directory.
//! This module reads them; it never interprets their content.

mod loader;

pub use loader::{read_sql, sql_file_name};
