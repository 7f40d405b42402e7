//! `avl-demo`: walk an AVL tree through a scripted insert/remove session.
//!
//! Usage:
//!   avl-demo
//!
//! Inserts seven animals keyed 1..=7, printing every lookup after each step,
//! then removes them one by one.  Environment:
//!
//! - `RUST_LOG`: tracing filter (default `info`)
//! - `AVL_DEMO_TRACE`: `true` to report rebalancing through `tracing`
//! - `AVL_DEMO_STRESS`: extra random keys to churn through afterwards (default 0)
//! - `AVL_DEMO_SEED`: seed for the stress pass (default 42)

use std::env;

use avl_tree::{AvlInspect, AvlTree, RebalanceEvent, RebalanceObserver, TracingObserver};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum ConfigError {
    #[error("{name} has invalid value {value:?}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct DemoConfig {
    trace: bool,
    stress: usize,
    seed: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            trace: false,
            stress: 0,
            seed: 42,
        }
    }
}

impl DemoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            trace: parsed(&lookup, "AVL_DEMO_TRACE", defaults.trace)?,
            stress: parsed(&lookup, "AVL_DEMO_STRESS", defaults.stress)?,
            seed: parsed(&lookup, "AVL_DEMO_SEED", defaults.seed)?,
        })
    }
}

fn parsed<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(name) else {
        return Ok(default);
    };
    let result = value.trim().parse::<T>();
    result.map_err(|e| ConfigError::InvalidValue {
        name,
        reason: e.to_string(),
        value,
    })
}

/// Forwards to [`TracingObserver`] only when tracing was asked for.
struct DemoObserver {
    trace: bool,
    rotations: usize,
}

impl RebalanceObserver for DemoObserver {
    fn observe(&mut self, event: RebalanceEvent) {
        if matches!(event, RebalanceEvent::Rotated { .. }) {
            self.rotations += 1;
        }
        if self.trace {
            TracingObserver.observe(event);
        }
    }
}

type DemoTree = AvlTree<i32, String, DemoObserver>;

fn print_tree_nodes(tree: &DemoTree) {
    for key in 1..=7 {
        match tree.get(&key) {
            Some(value) => println!("{key} --> {value}"),
            None => println!("{key} --> NULL"),
        }
    }
    match tree.check() {
        Ok(()) => println!("(valid AVL tree, {} nodes, height {})", tree.len(), tree.height()),
        Err(e) => println!("(INVALID: {e})"),
    }
}

/// Key range `-span..=span` for a stress pass of `ops` operations.
fn stress_span(ops: usize) -> i32 {
    i32::try_from(ops).unwrap_or(i32::MAX).clamp(1, i32::MAX / 4) * 4
}

fn stress(tree: &mut DemoTree, config: &DemoConfig) {
    let mut rng = Xoshiro256StarStar::seed_from_u64(config.seed);
    let span = stress_span(config.stress);
    for _ in 0..config.stress {
        let key = rng.gen_range(-span..=span);
        if rng.gen_bool(0.6) {
            tree.insert(key, format!("k{key}"));
        } else {
            tree.remove(&key);
        }
    }
    match tree.check() {
        Ok(()) => tracing::info!(
            ops = config.stress,
            seed = config.seed,
            len = tree.len(),
            height = tree.height(),
            "stress pass finished"
        ),
        Err(e) => tracing::error!(seed = config.seed, "stress pass broke the tree: {e}"),
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match DemoConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    tracing::info!(?config, "starting avl-demo");

    let mut tree = AvlTree::with_observer(DemoObserver {
        trace: config.trace,
        rotations: 0,
    });

    for (key, name) in [
        (2, "Bee"),
        (1, "Ant"),
        (5, "Eel"),
        (4, "Donkey"),
        (6, "Fox"),
        (3, "Cat"),
        (7, "Goat"),
    ] {
        tree.insert(key, name.to_string());
        println!("inserted {key}");
        print_tree_nodes(&tree);
    }
    println!("Initialised tree with {} nodes.", tree.len());
    println!("{tree:?}");

    for key in [2, 1, 5, 7, 6, 3, 4] {
        tree.remove(&key);
        println!("removed {key}");
        print_tree_nodes(&tree);
    }

    if config.stress > 0 {
        stress(&mut tree, &config);
    }
    tracing::info!(rotations = tree.observer().rotations, "done");
}
