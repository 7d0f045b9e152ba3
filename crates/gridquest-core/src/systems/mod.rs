//! Systems - logic that queries and updates entity components.

mod enemy;

pub use enemy::{damage_enemy, enemy_ai_system};
