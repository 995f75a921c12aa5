//! Lossy link simulation
//!
//! Models the transport the core expects: snapshots may be delayed or
//! lost, but whatever arrives from one sender arrives in send order.
//! - Latency with uniform jitter
//! - Random loss
//! - Burst loss

use std::collections::VecDeque;
use std::time::Duration;

use bytes::Bytes;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Link conditions
#[derive(Clone, Debug)]
pub struct LossyConfig {
    /// Base one-way latency
    pub base_latency: Duration,
    /// Uniform jitter range added to the base latency (ms)
    pub jitter_ms: (u32, u32),
    /// Independent loss rate (0.0 - 1.0)
    pub loss_rate: f64,
    /// Probability that a send starts a loss burst
    pub burst_loss_prob: f64,
    /// Burst length range, in packets
    pub burst_length: (u32, u32),
}

impl Default for LossyConfig {
    fn default() -> Self {
        LossyConfig {
            base_latency: Duration::from_millis(40),
            jitter_ms: (0, 30),
            loss_rate: 0.01,
            burst_loss_prob: 0.02,
            burst_length: (2, 5),
        }
    }
}

impl LossyConfig {
    /// No delay, no loss
    pub fn perfect() -> Self {
        LossyConfig {
            base_latency: Duration::ZERO,
            jitter_ms: (0, 0),
            loss_rate: 0.0,
            burst_loss_prob: 0.0,
            burst_length: (0, 0),
        }
    }

    /// Good wifi
    pub fn good() -> Self {
        LossyConfig {
            base_latency: Duration::from_millis(15),
            jitter_ms: (0, 10),
            loss_rate: 0.002,
            burst_loss_prob: 0.005,
            burst_length: (1, 2),
        }
    }

    /// Congested network
    pub fn poor() -> Self {
        LossyConfig {
            base_latency: Duration::from_millis(120),
            jitter_ms: (0, 80),
            loss_rate: 0.1,
            burst_loss_prob: 0.05,
            burst_length: (3, 10),
        }
    }
}

#[derive(Clone, Debug)]
struct InFlight {
    data: Bytes,
    delivery_time: Duration,
    send_time: Duration,
}

/// Link statistics
#[derive(Clone, Debug, Default)]
pub struct LinkStats {
    pub packets_sent: u64,
    pub packets_delivered: u64,
    pub packets_lost: u64,
    pub total_latency_ms: u64,
    pub max_latency_ms: u64,
}

impl LinkStats {
    pub fn loss_rate(&self) -> f64 {
        if self.packets_sent == 0 {
            0.0
        } else {
            self.packets_lost as f64 / self.packets_sent as f64
        }
    }

    pub fn avg_latency_ms(&self) -> f64 {
        if self.packets_delivered == 0 {
            0.0
        } else {
            self.total_latency_ms as f64 / self.packets_delivered as f64
        }
    }
}

/// One-directional, order-preserving lossy link
pub struct LossyLink {
    config: LossyConfig,
    rng: StdRng,
    in_flight: VecDeque<InFlight>,
    current_time: Duration,
    /// Latest scheduled delivery; later sends never arrive before it
    last_delivery: Duration,
    burst_remaining: u32,
    stats: LinkStats,
}

impl LossyLink {
    /// Create a link with a fixed seed
    pub fn new(config: LossyConfig, seed: u64) -> Self {
        LossyLink {
            config,
            rng: StdRng::seed_from_u64(seed),
            in_flight: VecDeque::new(),
            current_time: Duration::ZERO,
            last_delivery: Duration::ZERO,
            burst_remaining: 0,
            stats: LinkStats::default(),
        }
    }

    pub fn send(&mut self, data: Bytes) {
        self.stats.packets_sent += 1;

        if self.should_drop() {
            self.stats.packets_lost += 1;
            return;
        }

        let (min, max) = self.config.jitter_ms;
        let jitter = if max > min {
            Duration::from_millis(Uniform::new(min, max).sample(&mut self.rng) as u64)
        } else {
            Duration::from_millis(min as u64)
        };
        let delivery_time = (self.current_time + self.config.base_latency + jitter)
            .max(self.last_delivery);
        self.last_delivery = delivery_time;

        self.in_flight.push_back(InFlight {
            data,
            delivery_time,
            send_time: self.current_time,
        });
    }

    fn should_drop(&mut self) -> bool {
        if self.burst_remaining > 0 {
            self.burst_remaining -= 1;
            return true;
        }

        if self.config.burst_loss_prob > 0.0 && self.rng.gen::<f64>() < self.config.burst_loss_prob
        {
            let (a, b) = self.config.burst_length;
            // This packet is the first of the burst
            self.burst_remaining = self.rng.gen_range(a.min(b)..=a.max(b)).saturating_sub(1);
            return true;
        }

        self.config.loss_rate > 0.0 && self.rng.gen::<f64>() < self.config.loss_rate
    }

    /// Advance time and collect everything now due
    pub fn tick(&mut self, dt: Duration) -> Vec<Bytes> {
        self.current_time += dt;

        let mut delivered = Vec::new();
        while self
            .in_flight
            .front()
            .is_some_and(|packet| packet.delivery_time <= self.current_time)
        {
            let Some(packet) = self.in_flight.pop_front() else {
                break;
            };
            let latency = (packet.delivery_time - packet.send_time).as_millis() as u64;
            self.stats.packets_delivered += 1;
            self.stats.total_latency_ms += latency;
            self.stats.max_latency_ms = self.stats.max_latency_ms.max(latency);
            delivered.push(packet.data);
        }

        delivered
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }

    pub fn current_time(&self) -> Duration {
        self.current_time
    }
}
