/// One position in a collection that may still be loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<T> {
    Pending,
    Ready(T),
}

impl<T> Slot<T> {
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Self::Pending => None,
            Self::Ready(item) => Some(item),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// A collection rendered as placeholders until its single response arrives.
///
/// The response replaces the whole list; items never stream in one by one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotList<T> {
    slots: Vec<Slot<T>>,
}

impl<T> SlotList<T> {
    pub fn pending(count: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| Slot::Pending).take(count).collect(),
        }
    }

    pub fn resolve(&mut self, items: Vec<T>) {
        self.slots = items.into_iter().map(Slot::Ready).collect();
    }

    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.slots.iter().any(Slot::is_pending)
    }

    pub fn ready(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(Slot::as_ready)
    }
}
