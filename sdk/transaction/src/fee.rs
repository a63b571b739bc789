use blsct_config::FEES;

/// Flat fee per input and per output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeePolicy {
    pub per_component: u64,
}

impl FeePolicy {
    pub const fn new(per_component: u64) -> Self {
        Self { per_component }
    }

    /// Policy from the global configuration
    pub fn configured() -> Self {
        Self::new(FEES.per_component)
    }

    /// `None` on overflow
    pub fn fee_for(&self, inputs: usize, outputs: usize) -> Option<u64> {
        let components = inputs.checked_add(outputs)? as u64;
        self.per_component.checked_mul(components)
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::new(blsct_config::DEFAULT_FEE_PER_COMPONENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_for() {
        let policy = FeePolicy::default();
        assert_eq!(policy.fee_for(1, 1), Some(400_000));
        assert_eq!(FeePolicy::new(0).fee_for(3, 3), Some(0));
        assert_eq!(FeePolicy::new(u64::MAX).fee_for(1, 1), None);
    }
}
