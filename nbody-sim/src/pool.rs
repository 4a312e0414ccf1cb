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
//! Memory pooling for reducing allocation churn
//!
//! The Barnes–Hut solver builds a new octree on every force evaluation. An
//! [`ArenaPool`] hands the node storage of the previous tree back out so a
//! long run settles into a steady state with no per-step allocations.
//!
//! Pools are owned by a single solver and are not shared across threads.

use log::debug;

/// Configuration for buffer pool behavior
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Initial capacity for each newly allocated buffer
    pub initial_capacity: usize,
    /// Maximum number of idle buffers to keep in the pool
    pub max_pool_size: usize,
    /// Whether to log when the pool has to allocate
    pub log_resize_events: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            initial_capacity: 64,
            max_pool_size: 2,
            log_resize_events: false,
        }
    }
}

impl PoolConfig {
    /// Create a new pool configuration with custom settings
    pub fn new(initial_capacity: usize, max_pool_size: usize) -> Self {
        PoolConfig {
            initial_capacity,
            max_pool_size,
            log_resize_events: false,
        }
    }

    /// Enable logging for allocation events
    pub fn with_logging(mut self) -> Self {
        self.log_resize_events = true;
        self
    }

    /// Set the maximum number of idle buffers
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn with_max_pool_size(mut self, size: usize) -> Self {
        assert!(size >= 1, "Pool size must be at least 1");
        self.max_pool_size = size;
        self
    }
}

/// Statistics for monitoring pool performance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolStats {
    /// Number of times a buffer was reused from the pool
    pub hits: usize,
    /// Number of times a new buffer had to be allocated
    pub misses: usize,
    /// Current number of idle buffers in the pool
    pub pool_size: usize,
    /// Peak number of idle buffers ever held
    pub peak_size: usize,
    /// Largest capacity of any buffer returned to the pool
    pub peak_capacity: usize,
}

impl PoolStats {
    /// Calculate the hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// A pool of reusable `Vec<T>` buffers
///
/// # Examples
///
/// ```
/// use nbody_sim::pool::ArenaPool;
///
/// let mut pool: ArenaPool<u32> = ArenaPool::new();
/// let mut buffer = pool.acquire();
/// buffer.extend([1, 2, 3]);
/// pool.release(buffer);
///
/// let reused = pool.acquire();
/// assert!(reused.is_empty());
/// assert!(reused.capacity() >= 3);
/// assert_eq!(pool.stats().hits, 1);
/// ```
#[derive(Debug)]
pub struct ArenaPool<T> {
    buffers: Vec<Vec<T>>,
    config: PoolConfig,
    stats: PoolStats,
}

impl<T> ArenaPool<T> {
    /// Create a new pool with default configuration
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Create a new pool with custom configuration
    pub fn with_config(config: PoolConfig) -> Self {
        ArenaPool {
            buffers: Vec::new(),
            config,
            stats: PoolStats::default(),
        }
    }

    /// Take an empty buffer, reusing a pooled one when available
    pub fn acquire(&mut self) -> Vec<T> {
        match self.buffers.pop() {
            Some(mut buffer) => {
                buffer.clear();
                self.stats.hits += 1;
                self.stats.pool_size = self.buffers.len();
                buffer
            }
            None => {
                self.stats.misses += 1;
                if self.config.log_resize_events {
                    debug!(
                        "ArenaPool: allocating new buffer (hit rate: {:.1}%)",
                        self.stats.hit_rate()
                    );
                }
                Vec::with_capacity(self.config.initial_capacity)
            }
        }
    }

    /// Return a buffer for reuse
    ///
    /// If the pool is already full the buffer is dropped.
    pub fn release(&mut self, buffer: Vec<T>) {
        if self.buffers.len() < self.config.max_pool_size {
            self.stats.peak_capacity = self.stats.peak_capacity.max(buffer.capacity());
            self.buffers.push(buffer);
            self.stats.pool_size = self.buffers.len();
            self.stats.peak_size = self.stats.peak_size.max(self.stats.pool_size);
        }
    }

    /// Get current pool statistics
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Drop all idle buffers
    pub fn clear(&mut self) {
        self.buffers.clear();
        self.stats.pool_size = 0;
    }

    /// Number of idle buffers
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Check if the pool holds no idle buffers
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

impl<T> Default for ArenaPool<T> {
    fn default() -> Self {
        Self::new()
    }
}
