//! Event log migrations, embedded at compile time
//!
//! Each entry is `(file name, sql)`. They are applied in this order and
//! recorded in `sys_migrations`; add new files at the end.

pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];
