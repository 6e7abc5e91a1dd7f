//! Contract ABIs touched by the swap flow.

use alloy::sol;

sol! {
    /// Minimal ERC-20 surface: balances, allowance and approval.
    #[derive(Debug)]
    interface IERC20 {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 value) external returns (bool);
    }

    /// Wrapped-native token deposit.
    #[derive(Debug)]
    interface IWETH {
        function deposit() external payable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};
    use alloy::sol_types::SolCall;

    #[test]
    fn test_selectors() {
        assert_eq!(IERC20::approveCall::SELECTOR, [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(IERC20::allowanceCall::SELECTOR, [0xdd, 0x62, 0xed, 0x3e]);
        assert_eq!(IERC20::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(IWETH::depositCall::SELECTOR, [0xd0, 0xe3, 0x0d, 0xb0]);
    }

    #[test]
    fn test_approve_max_encoding() {
        let call = IERC20::approveCall {
            spender: Address::repeat_byte(0x22),
            value: U256::MAX,
        };
        let data = call.abi_encode();
        assert_eq!(data.len(), 4 + 32 + 32);
        assert!(data[36..].iter().all(|b| *b == 0xff));
    }
}
