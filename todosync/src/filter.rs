//! Status filter: a pure projection of the store for display.

use todosync_proto::todo::Todo;

/// Which records the list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every record.
    #[default]
    All,
    /// Records not yet completed.
    Active,
    /// Completed records.
    Completed,
}

impl StatusFilter {
    /// All filters in display order.
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Whether `todo` passes this filter.
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }

    /// Label shown in the footer.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// The next filter, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::All,
        }
    }
}

/// Returns the records passing `filter`, in store order.
///
/// Borrows from `todos`; never copies or mutates the store.
#[must_use]
pub fn visible(todos: &[Todo], filter: StatusFilter) -> Vec<&Todo> {
    todos.iter().filter(|t| filter.matches(t)).collect()
}
