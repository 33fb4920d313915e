// Gravity catalog (m/s²), the single definition shared by both services
pub const STANDARD_GRAVITY: [(&str, f64); 9] = [
    ("Earth", 9.81),
    ("Moon", 1.62),
    ("Mars", 3.71),
    ("Jupiter", 24.79),
    ("Venus", 8.87),
    ("Mercury", 3.7),
    ("Saturn", 10.44),
    ("Uranus", 8.69),
    ("Neptune", 11.15),
];

// Simulation Parameters
pub const SAMPLE_INTERVAL: f64 = 0.01; // s
pub const STOP_TIME: f64 = 10.0; // s
pub const RESTITUTION: f64 = 0.8;
pub const REST_SPEED: f64 = 1e-3; // m/s, rebounds slower than this end the bounce sequence
pub const MAX_GROUND_CONTACTS: usize = 10_000;
pub const CONTACT_TIME_TOLERANCE: f64 = 1e-9; // s

// Request Defaults
pub const DEFAULT_PLANET: &str = "Earth";
pub const DEFAULT_DROP_HEIGHT: f64 = 3.0; // m

// Service Defaults
pub const SIMULATOR_PORT: u16 = 8000;
pub const DASHBOARD_PORT: u16 = 5050;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Chart Layout
pub const HEADROOM_FACTOR: f64 = 1.1;
pub const CHART_HEIGHT_PX: u32 = 500;
