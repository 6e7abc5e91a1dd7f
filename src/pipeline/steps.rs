//! The ordered, named steps of a swap run.

/// One stage of the swap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapStep {
    /// Grant the router an unlimited allowance if it has none.
    Approve,
    /// Deposit native token into the wrapped-native contract.
    Wrap,
    /// Ask the routing API for a path.
    Quote,
    /// Turn the path into executable calldata.
    Assemble,
    /// Sign and submit the swap.
    Swap,
    /// Wait for the swap receipt.
    Confirm,
}

impl SwapStep {
    /// Execution order. Each step completes before the next starts.
    pub const ORDERED: [SwapStep; 6] = [
        SwapStep::Approve,
        SwapStep::Wrap,
        SwapStep::Quote,
        SwapStep::Assemble,
        SwapStep::Swap,
        SwapStep::Confirm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SwapStep::Approve => "approve",
            SwapStep::Wrap => "wrap",
            SwapStep::Quote => "quote",
            SwapStep::Assemble => "assemble",
            SwapStep::Swap => "swap",
            SwapStep::Confirm => "confirm",
        }
    }

    /// Whether the pacing delay follows this step.
    pub fn paced_after(self) -> bool {
        matches!(
            self,
            SwapStep::Approve | SwapStep::Quote | SwapStep::Assemble | SwapStep::Swap
        )
    }
}

impl std::fmt::Display for SwapStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
