//! Mode-aware tolerance (hysteresis band) selection
//!
//! Maps the current HVAC mode and the configured tolerance set to the
//! active (cold, hot) pair. Mode-specific tolerances override the legacy
//! pair; in heat/cool mode the regime is picked by comparing current
//! against target. Pure and deterministic.

use climate_config::ToleranceConfig;
use climate_core::HvacMode;

/// Select the active (cold_tolerance, hot_tolerance) pair
///
/// Priority order, first match wins:
/// 1. heat mode with `heat_tolerance` set
/// 2. cool or fan-only mode with `cool_tolerance` set
/// 3. heat/cool mode: heating regime below target, cooling regime at or
///    above it (falls through when either temperature is unknown)
/// 4. the legacy `(cold_tolerance, hot_tolerance)` pair
pub fn select(
    mode: HvacMode,
    cfg: &ToleranceConfig,
    current_temp: Option<f64>,
    target_temp: Option<f64>,
) -> (f64, f64) {
    match mode {
        HvacMode::Heat => heating_band(cfg),
        HvacMode::Cool | HvacMode::FanOnly => cooling_band(cfg),
        HvacMode::HeatCool => match (current_temp, target_temp) {
            (Some(current), Some(target)) if current < target => heating_band(cfg),
            (Some(_), Some(_)) => cooling_band(cfg),
            _ => legacy_band(cfg),
        },
        HvacMode::Dry | HvacMode::Off => legacy_band(cfg),
    }
}

fn heating_band(cfg: &ToleranceConfig) -> (f64, f64) {
    match cfg.heat_tolerance {
        Some(tol) => (tol, tol),
        None => legacy_band(cfg),
    }
}

fn cooling_band(cfg: &ToleranceConfig) -> (f64, f64) {
    match cfg.cool_tolerance {
        Some(tol) => (tol, tol),
        None => legacy_band(cfg),
    }
}

fn legacy_band(cfg: &ToleranceConfig) -> (f64, f64) {
    (cfg.cold_tolerance, cfg.hot_tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(heat: Option<f64>, cool: Option<f64>) -> ToleranceConfig {
        ToleranceConfig {
            cold_tolerance: 0.5,
            hot_tolerance: 0.7,
            heat_tolerance: heat,
            cool_tolerance: cool,
        }
    }

    // ==================== Backward compatibility ====================

    #[test]
    fn test_legacy_pair_used_when_mode_tolerances_unset() {
        let cfg = cfg(None, None);
        for mode in [
            HvacMode::Heat,
            HvacMode::Cool,
            HvacMode::HeatCool,
            HvacMode::FanOnly,
            HvacMode::Dry,
            HvacMode::Off,
        ] {
            assert_eq!(select(mode, &cfg, Some(20.0), Some(21.0)), (0.5, 0.7));
        }
    }

    // ==================== Mode-specific selection ====================

    #[test]
    fn test_heat_mode_uses_heat_tolerance() {
        let cfg = cfg(Some(0.3), Some(2.0));
        assert_eq!(select(HvacMode::Heat, &cfg, Some(19.0), Some(21.0)), (0.3, 0.3));
    }

    #[test]
    fn test_cool_and_fan_only_use_cool_tolerance() {
        let cfg = cfg(Some(0.3), Some(2.0));
        assert_eq!(select(HvacMode::Cool, &cfg, Some(25.0), Some(21.0)), (2.0, 2.0));
        assert_eq!(
            select(HvacMode::FanOnly, &cfg, Some(25.0), Some(21.0)),
            (2.0, 2.0)
        );
    }

    #[test]
    fn test_heat_mode_falls_back_without_heat_tolerance() {
        let cfg = cfg(None, Some(2.0));
        assert_eq!(select(HvacMode::Heat, &cfg, Some(19.0), Some(21.0)), (0.5, 0.7));
    }

    // ==================== Heat/cool regime switching ====================

    #[test]
    fn test_heat_cool_switches_regime_exactly_at_target() {
        let cfg = cfg(Some(0.3), Some(2.0));
        // Below target: heating regime
        assert_eq!(
            select(HvacMode::HeatCool, &cfg, Some(20.5), Some(21.0)),
            (0.3, 0.3)
        );
        // At target: cooling regime (current < target is false)
        assert_eq!(
            select(HvacMode::HeatCool, &cfg, Some(21.0), Some(21.0)),
            (2.0, 2.0)
        );
        // Above target: cooling regime
        assert_eq!(
            select(HvacMode::HeatCool, &cfg, Some(21.5), Some(21.0)),
            (2.0, 2.0)
        );
    }

    #[test]
    fn test_heat_cool_with_unknown_temperature_falls_through() {
        let cfg = cfg(Some(0.3), Some(2.0));
        assert_eq!(select(HvacMode::HeatCool, &cfg, None, Some(21.0)), (0.5, 0.7));
        assert_eq!(select(HvacMode::HeatCool, &cfg, Some(20.0), None), (0.5, 0.7));
        assert_eq!(select(HvacMode::HeatCool, &cfg, None, None), (0.5, 0.7));
    }
}
