/// Result of one fan-out pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Subscribers that accepted the payload
    pub delivered: usize,
    /// Subscribers removed because their write failed
    pub dropped: usize,
}
