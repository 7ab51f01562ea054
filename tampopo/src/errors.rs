#[derive(Debug, Eq, PartialEq)]
pub enum SortError<Node> {
    /// The edges that were still unresolved when the sort stalled.
    CycleDetected(Vec<(Node, Node)>),
}

impl<Node> std::error::Error for SortError<Node> where Node: core::fmt::Display + core::fmt::Debug {}

impl<Node: std::fmt::Display> std::fmt::Display for SortError<Node> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SortError::CycleDetected(edges) => {
                writeln!(f, "Cycle detected between {} edges:", edges.len())?;
                for (src, dest) in edges.iter() {
                    writeln!(f, "  {} → {}", src, dest)?;
                }
                Ok(())
            }
        }
    }
}
