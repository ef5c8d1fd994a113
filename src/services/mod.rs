// Wayfarer services
// Services provide cross-cutting functionality; currently the preferences engine.

pub mod settings_engine;
