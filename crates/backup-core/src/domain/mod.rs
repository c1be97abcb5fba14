//! Domain types with no I/O.
//!
//! - **`name`** – the naming rule shared by remotes and jobs.
//! - **`job`**  – backup job records and the create/update/delete rules for
//!   the job list.
//! - **`disk`** – disk-usage records and the `df` output parser.
//! - **`clock`** – local-time timestamp strings.

pub mod clock;
pub mod disk;
pub mod job;
pub mod name;
