pub mod kinematics;
pub mod trajectory;
