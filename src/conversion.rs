//! Fixed-point scaling shared by the temperature, limit and offset registers.

/// Degrees Celsius per LSB (1/128 °C).
pub const LSB_CELSIUS: f32 = 0.0078125;

pub fn raw_to_celsius(raw: i16) -> f32 {
    raw as f32 * LSB_CELSIUS
}

/// Truncates toward zero. Values outside the register range saturate, NaN becomes 0.
pub fn celsius_to_raw(celsius: f32) -> i16 {
    (celsius / LSB_CELSIUS) as i16
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 1.8 + 32.0
}
