use indexmap::IndexMap;

use super::error::RuntimeError;
use crate::value::Value;

pub type NativeFn = fn(&[Value]) -> Result<Value, RuntimeError>;

/// The host-provided physics functions, dispatched by name from `Call`
/// expressions. Registration order is preserved.
pub struct NativeRegistry {
    functions: IndexMap<&'static str, NativeFn>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        let mut functions: IndexMap<&'static str, NativeFn> = IndexMap::new();

        // Motion (kinematics)
        functions.insert("speed", native_speed as NativeFn);
        functions.insert("velocity", native_velocity);
        functions.insert("acceleration", native_acceleration);
        functions.insert("distance", native_distance);
        functions.insert("final_velocity", native_final_velocity);

        // Force and mechanics
        functions.insert("force", native_force);
        functions.insert("weight", native_weight);
        functions.insert("pressure", native_pressure);
        functions.insert("momentum", native_momentum);
        functions.insert("impulse", native_impulse);

        // Work, energy, power
        functions.insert("work", native_work);
        functions.insert("kinetic_energy", native_kinetic_energy);
        functions.insert("potential_energy", native_potential_energy);
        functions.insert("power", native_power);

        // Circular motion
        functions.insert("centripetal_force", native_centripetal_force);
        functions.insert("angular_speed", native_angular_speed);

        // Electricity
        functions.insert("voltage", native_voltage);
        functions.insert("current", native_current);
        functions.insert("electrical_power", native_electrical_power);
        functions.insert("electrical_energy", native_electrical_energy);

        // Waves
        functions.insert("wave_speed", native_wave_speed);
        functions.insert("frequency", native_frequency);

        // Heat and thermodynamics
        functions.insert("heat_energy", native_heat_energy);
        functions.insert("to_kelvin", native_to_kelvin);
        functions.insert("to_fahrenheit", native_to_fahrenheit);

        // Relativity
        functions.insert("mass_energy", native_mass_energy);

        Self { functions }
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        match self.functions.get(name) {
            Some(function) => function(args),
            None => Err(RuntimeError::unknown_function(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }
}

impl Default for NativeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks the arity and extracts every argument as f64. A non-numeric
/// argument is a fatal type error.
fn nums<const N: usize>(name: &'static str, args: &[Value]) -> Result<[f64; N], RuntimeError> {
    if args.len() != N {
        return Err(RuntimeError::arity_mismatch(name, N, args.len()));
    }
    let mut out = [0.0; N];
    for (i, arg) in args.iter().enumerate() {
        out[i] = arg.as_number().ok_or_else(|| {
            RuntimeError::type_error(format!(
                "argument {} of `{}` must be a number, got {}",
                i + 1,
                name,
                arg.type_name()
            ))
        })?;
    }
    Ok(out)
}

// speed(distance, time) -> d / t
fn native_speed(args: &[Value]) -> Result<Value, RuntimeError> {
    let [d, t] = nums("speed", args)?;
    if t == 0.0 {
        return Ok(Value::Float(0.0));
    }
    Ok(Value::Float(d / t))
}

// velocity(displacement, time) -> d / t
fn native_velocity(args: &[Value]) -> Result<Value, RuntimeError> {
    let [d, t] = nums("velocity", args)?;
    if t == 0.0 {
        return Ok(Value::Float(0.0));
    }
    Ok(Value::Float(d / t))
}

// acceleration(final_velocity, initial_velocity, time) -> (vf - vi) / t
fn native_acceleration(args: &[Value]) -> Result<Value, RuntimeError> {
    let [vf, vi, t] = nums("acceleration", args)?;
    if t == 0.0 {
        return Ok(Value::Float(0.0));
    }
    Ok(Value::Float((vf - vi) / t))
}

// distance(speed, time) -> s * t
fn native_distance(args: &[Value]) -> Result<Value, RuntimeError> {
    let [s, t] = nums("distance", args)?;
    Ok(Value::Float(s * t))
}

// final_velocity(u, a, t) -> u + a*t
fn native_final_velocity(args: &[Value]) -> Result<Value, RuntimeError> {
    let [u, a, t] = nums("final_velocity", args)?;
    Ok(Value::Float(u + a * t))
}

// force(mass, acceleration) -> m * a
fn native_force(args: &[Value]) -> Result<Value, RuntimeError> {
    let [m, a] = nums("force", args)?;
    Ok(Value::Float(m * a))
}

// weight(mass, gravity) -> m * g
fn native_weight(args: &[Value]) -> Result<Value, RuntimeError> {
    let [m, g] = nums("weight", args)?;
    Ok(Value::Float(m * g))
}

// pressure(force, area) -> F / A
fn native_pressure(args: &[Value]) -> Result<Value, RuntimeError> {
    let [f, a] = nums("pressure", args)?;
    if a == 0.0 {
        return Ok(Value::Float(0.0));
    }
    Ok(Value::Float(f / a))
}

// momentum(mass, velocity) -> m * v
fn native_momentum(args: &[Value]) -> Result<Value, RuntimeError> {
    let [m, v] = nums("momentum", args)?;
    Ok(Value::Float(m * v))
}

// impulse(force, time) -> F * t
fn native_impulse(args: &[Value]) -> Result<Value, RuntimeError> {
    let [f, t] = nums("impulse", args)?;
    Ok(Value::Float(f * t))
}

// work(force, distance) -> F * d
fn native_work(args: &[Value]) -> Result<Value, RuntimeError> {
    let [f, d] = nums("work", args)?;
    Ok(Value::Float(f * d))
}

// kinetic_energy(mass, velocity) -> 0.5 * m * v^2
fn native_kinetic_energy(args: &[Value]) -> Result<Value, RuntimeError> {
    let [m, v] = nums("kinetic_energy", args)?;
    Ok(Value::Float(0.5 * m * v * v))
}

// potential_energy(mass, gravity, height) -> m * g * h
fn native_potential_energy(args: &[Value]) -> Result<Value, RuntimeError> {
    let [m, g, h] = nums("potential_energy", args)?;
    Ok(Value::Float(m * g * h))
}

// power(work, time) -> W / t
fn native_power(args: &[Value]) -> Result<Value, RuntimeError> {
    let [w, t] = nums("power", args)?;
    if t == 0.0 {
        return Ok(Value::Float(0.0));
    }
    Ok(Value::Float(w / t))
}

// centripetal_force(mass, velocity, radius) -> m * v^2 / r
fn native_centripetal_force(args: &[Value]) -> Result<Value, RuntimeError> {
    let [m, v, r] = nums("centripetal_force", args)?;
    if r == 0.0 {
        return Ok(Value::Float(0.0));
    }
    Ok(Value::Float(m * v * v / r))
}

// angular_speed(period) -> 2*pi / T
fn native_angular_speed(args: &[Value]) -> Result<Value, RuntimeError> {
    let [t] = nums("angular_speed", args)?;
    if t == 0.0 {
        return Ok(Value::Float(0.0));
    }
    Ok(Value::Float(2.0 * std::f64::consts::PI / t))
}

// voltage(current, resistance) -> I * R
fn native_voltage(args: &[Value]) -> Result<Value, RuntimeError> {
    let [i, r] = nums("voltage", args)?;
    Ok(Value::Float(i * r))
}

// current(voltage, resistance) -> V / R
fn native_current(args: &[Value]) -> Result<Value, RuntimeError> {
    let [v, r] = nums("current", args)?;
    if r == 0.0 {
        return Ok(Value::Float(0.0));
    }
    Ok(Value::Float(v / r))
}

// electrical_power(voltage, current) -> V * I
fn native_electrical_power(args: &[Value]) -> Result<Value, RuntimeError> {
    let [v, i] = nums("electrical_power", args)?;
    Ok(Value::Float(v * i))
}

// electrical_energy(power, time) -> P * t
fn native_electrical_energy(args: &[Value]) -> Result<Value, RuntimeError> {
    let [p, t] = nums("electrical_energy", args)?;
    Ok(Value::Float(p * t))
}

// wave_speed(frequency, wavelength) -> f * lambda
fn native_wave_speed(args: &[Value]) -> Result<Value, RuntimeError> {
    let [f, lambda] = nums("wave_speed", args)?;
    Ok(Value::Float(f * lambda))
}

// frequency(period) -> 1 / T
fn native_frequency(args: &[Value]) -> Result<Value, RuntimeError> {
    let [t] = nums("frequency", args)?;
    if t == 0.0 {
        return Ok(Value::Float(0.0));
    }
    Ok(Value::Float(1.0 / t))
}

// heat_energy(mass, specific_heat, delta_temp) -> m * c * dT
fn native_heat_energy(args: &[Value]) -> Result<Value, RuntimeError> {
    let [m, c, dt] = nums("heat_energy", args)?;
    Ok(Value::Float(m * c * dt))
}

// to_kelvin(celsius) -> C + 273.15
fn native_to_kelvin(args: &[Value]) -> Result<Value, RuntimeError> {
    let [c] = nums("to_kelvin", args)?;
    Ok(Value::Float(c + 273.15))
}

// to_fahrenheit(celsius) -> C * 1.8 + 32
fn native_to_fahrenheit(args: &[Value]) -> Result<Value, RuntimeError> {
    let [c] = nums("to_fahrenheit", args)?;
    Ok(Value::Float(c * 1.8 + 32.0))
}

// mass_energy(mass) -> m * c^2
fn native_mass_energy(args: &[Value]) -> Result<Value, RuntimeError> {
    let [m] = nums("mass_energy", args)?;
    let c = 299_792_458.0;
    Ok(Value::Float(m * c * c))
}
