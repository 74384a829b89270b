// src/supervisor/presets.rs

//! Built-in defaults and per-category presets.
//!
//! These are only the fallbacks: a `[supervisor]` / `[preset.<category>]`
//! config section overrides any of them.

use std::time::Duration;

use crate::types::Category;

use super::deadline::Deadline;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MESSAGE: &str = "Operation timed out";

/// Elapsed time after which a progress tracker starts warning.
pub const SLOW_WARNING_MS: u64 = 5_000;

/// How often `observe` polls a tracker.
pub const PROGRESS_INTERVAL_MS: u64 = 1_000;

pub const QUERY_TIMEOUT_MS: u64 = 15_000;
pub const QUERY_MESSAGE: &str = "Database query timed out";

pub const AUTH_TIMEOUT_MS: u64 = 20_000;
pub const AUTH_MESSAGE: &str = "Authentication timed out";

pub const INSERT_TIMEOUT_MS: u64 = 30_000;
pub const INSERT_MESSAGE: &str = "Insert operation timed out";

/// Built-in deadline for a category.
pub fn builtin_preset(category: Category) -> Deadline {
    match category {
        Category::Query => Deadline::new(QUERY_TIMEOUT_MS, QUERY_MESSAGE),
        Category::Auth => Deadline::new(AUTH_TIMEOUT_MS, AUTH_MESSAGE),
        Category::Insert => Deadline::new(INSERT_TIMEOUT_MS, INSERT_MESSAGE),
    }
}

/// Deadline table for every [`Category`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presets {
    query: Deadline,
    auth: Deadline,
    insert: Deadline,
}

impl Presets {
    pub fn get(&self, category: Category) -> &Deadline {
        match category {
            Category::Query => &self.query,
            Category::Auth => &self.auth,
            Category::Insert => &self.insert,
        }
    }

    pub fn set(&mut self, category: Category, deadline: Deadline) {
        match category {
            Category::Query => self.query = deadline,
            Category::Auth => self.auth = deadline,
            Category::Insert => self.insert = deadline,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &Deadline)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

impl Default for Presets {
    fn default() -> Self {
        Self {
            query: builtin_preset(Category::Query),
            auth: builtin_preset(Category::Auth),
            insert: builtin_preset(Category::Insert),
        }
    }
}

pub fn slow_warning_threshold() -> Duration {
    Duration::from_millis(SLOW_WARNING_MS)
}
