// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Configuration errors
//!
//! Only genuinely invalid input produces an error. Numerical trouble during a
//! run (huge accelerations, non-finite positions) is not an error; it shows
//! up in the diagnostics instead.

use std::fmt;

/// Reasons a simulation cannot be constructed
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Timestep is zero, negative, NaN or infinite
    InvalidTimestep(f64),
    /// Softening length is negative, NaN or infinite
    InvalidSoftening(f64),
    /// Gravitational constant is not strictly positive and finite
    InvalidGravitationalConstant(f64),
    /// A recording stride is zero
    InvalidStride {
        /// Name of the configuration field
        field: &'static str,
    },
    /// Barnes–Hut opening angle is negative, NaN or infinite
    InvalidTheta(f64),
    /// A body has a non-positive mass or non-finite coordinates
    InvalidBody {
        /// Index of the offending body
        index: usize,
        /// What is wrong with it
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTimestep(dt) => {
                write!(f, "Invalid timestep: {}. Must be positive and finite.", dt)
            }
            ConfigError::InvalidSoftening(eps) => {
                write!(f, "Invalid softening length: {}. Must be non-negative and finite.", eps)
            }
            ConfigError::InvalidGravitationalConstant(g) => {
                write!(f, "Invalid gravitational constant: {}. Must be positive and finite.", g)
            }
            ConfigError::InvalidStride { field } => {
                write!(f, "Invalid {}: must be at least 1.", field)
            }
            ConfigError::InvalidTheta(theta) => {
                write!(f, "Invalid opening angle: {}. Must be non-negative and finite.", theta)
            }
            ConfigError::InvalidBody { index, reason } => {
                write!(f, "Invalid body at index {}: {}.", index, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvalidTimestep(-0.1);
        assert_eq!(err.to_string(), "Invalid timestep: -0.1. Must be positive and finite.");

        let err = ConfigError::InvalidStride { field: "frame_every" };
        assert!(err.to_string().contains("frame_every"));

        let err = ConfigError::InvalidBody { index: 3, reason: "mass must be positive and finite" };
        assert!(err.to_string().contains("index 3"));
    }

    #[test]
    fn test_error_is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&ConfigError::InvalidSoftening(f64::NAN));
    }
}
