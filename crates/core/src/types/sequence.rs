//! Named counters for sequential IDs.

/// A named counter of the sequence allocator.
///
/// Each variant maps to one row of the counter table. Names are part of the
/// stored data and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sequence {
    /// Customer numbers.
    Customer,
    /// Admin and superadmin numbers.
    Staff,
    /// Category IDs.
    Category,
    /// Product IDs.
    Product,
}

impl Sequence {
    /// Returns the stored counter name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Customer => "clienteId",
            Self::Staff => "usuarioId",
            Self::Category => "categoriaId",
            Self::Product => "productoId",
        }
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_names_are_stable() {
        assert_eq!(Sequence::Customer.name(), "clienteId");
        assert_eq!(Sequence::Staff.name(), "usuarioId");
        assert_eq!(Sequence::Category.name(), "categoriaId");
        assert_eq!(Sequence::Product.name(), "productoId");
    }
}
