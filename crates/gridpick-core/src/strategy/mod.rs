// Strategy engine: roster needs, round guidance, weighted recommendations.

pub mod guidance;
pub mod needs;
pub mod recommend;
