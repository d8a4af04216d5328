use std::fmt;

/// The download state shown by one row of the list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemState {
    Active(f32),
    Inactive(f32),
    Completed,
}

impl ItemState {
    pub fn progress(&self) -> f32 {
        match self {
            Self::Active(progress) | Self::Inactive(progress) => *progress,
            Self::Completed => 100.,
        }
    }

    /// The state after tapping the row button.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Active(progress) => Self::Inactive(*progress),
            Self::Inactive(progress) => Self::Active(*progress),
            Self::Completed => Self::Inactive(0.),
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active(progress) => write!(f, "Downloading {}%", progress),
            Self::Inactive(progress) => write!(f, "Paused {}%", progress),
            Self::Completed => write!(f, "Downloaded"),
        }
    }
}

pub fn create_items() -> Vec<ItemState> {
    [
        ItemState::Inactive(0.),
        ItemState::Completed,
        ItemState::Active(0.),
        ItemState::Active(50.),
        ItemState::Active(65.),
        ItemState::Completed,
    ]
    .into_iter()
    .cycle()
    .take(18)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_progress() {
        assert_eq!(ItemState::Active(50.).progress(), 50.);
        assert_eq!(ItemState::Inactive(65.).progress(), 65.);
        assert_eq!(ItemState::Completed.progress(), 100.);
    }

    #[test]
    fn test_toggled() {
        assert_eq!(ItemState::Active(50.).toggled(), ItemState::Inactive(50.));
        assert_eq!(ItemState::Inactive(50.).toggled(), ItemState::Active(50.));
        assert_eq!(ItemState::Completed.toggled(), ItemState::Inactive(0.));
    }

    #[test]
    fn test_create_items() {
        let items = create_items();
        assert_eq!(items.len(), 18);
        assert_eq!(items[0], ItemState::Inactive(0.));
        assert_eq!(items[6], ItemState::Inactive(0.));
        assert_eq!(items[17], ItemState::Completed);
        assert_eq!(ItemState::Active(65.).to_string(), "Downloading 65%");
    }
}
