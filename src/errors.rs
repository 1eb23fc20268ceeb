use crate::circular_list::NodeId;

/// Circular list operation failure
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum ListError {
    /// The operation needs at least one node.
    EmptyList,
    /// The handle does not address a live node of this list.
    InvalidNode(NodeId),
    /// More nodes requested for a splice than the list holds.
    SpliceOutOfRange { requested: usize, len: usize },
}

/// Cup game setup failure
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum CupsError {
    /// No labels in the input.
    EmptyInput,
    /// Input character is not a cup label.
    InvalidLabel(char),
    /// Label occurs more than once.
    DuplicateLabel(u32),
    /// The game needs at least four cups, got this many.
    TooFewCups(usize),
    /// Label the answer is read from is not in the circle.
    MissingLabel(u32),
    /// Label cannot be placed in a dense circle of the requested size.
    LabelOutOfRange(u32),
}
