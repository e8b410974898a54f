// * Explicit generation settings. Nothing is inherited implicitly from the checkpoint.

use crate::config::constants::*;
use candle_transformers::generation::Sampling;

/// Next-token selection strategy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplingPolicy {
    /// Always take the most likely token
    Greedy,
    /// Top-k, then nucleus filtering, then temperature sampling
    TopKTopP {
        temperature: f64,
        top_k: usize,
        top_p: f64,
    },
}

impl SamplingPolicy {
    /// Replaces the temperature; zero or below collapses to greedy
    pub fn with_temperature(self, temperature: f64) -> Self {
        if temperature <= 0.0 {
            return SamplingPolicy::Greedy;
        }
        match self {
            SamplingPolicy::Greedy => SamplingPolicy::TopKTopP {
                temperature,
                top_k: DEFAULT_TOP_K,
                top_p: DEFAULT_TOP_P,
            },
            SamplingPolicy::TopKTopP { top_k, top_p, .. } => SamplingPolicy::TopKTopP {
                temperature,
                top_k,
                top_p,
            },
        }
    }

    pub fn to_sampling(&self) -> Sampling {
        match *self {
            SamplingPolicy::Greedy => Sampling::ArgMax,
            SamplingPolicy::TopKTopP {
                temperature,
                top_k,
                top_p,
            } => Sampling::TopKThenTopP {
                k: top_k,
                p: top_p,
                temperature,
            },
        }
    }
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        SamplingPolicy::TopKTopP {
            temperature: DEFAULT_TEMPERATURE,
            top_k: DEFAULT_TOP_K,
            top_p: DEFAULT_TOP_P,
        }
    }
}

/// Bounds and policy for one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Hard cap on newly produced tokens
    pub max_new_tokens: usize,
    pub sampling: SamplingPolicy,
    /// RNG seed for sampling (ignored by greedy decoding)
    pub seed: u64,
    /// 1.0 disables the penalty
    pub repeat_penalty: f32,
    /// How many trailing tokens the repeat penalty looks at
    pub repeat_last_n: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_new_tokens: MAX_NEW_TOKENS,
            sampling: SamplingPolicy::default(),
            seed: DEFAULT_SEED,
            repeat_penalty: DEFAULT_REPEAT_PENALTY,
            repeat_last_n: DEFAULT_REPEAT_LAST_N,
        }
    }
}
