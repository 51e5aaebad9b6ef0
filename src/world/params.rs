use crate::error::ConfigError;
use serde::Deserialize;

/// Physical and administrative constants of the soccer server.
///
/// Defaults are the values of a stock rcssserver. A YAML `params` section may
/// override any subset; the table is immutable once the agent starts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerParameters {
    pub audio_cut_dist: f32,
    pub auto_mode: i32,
    pub back_passes: i32,
    pub ball_accel_max: f32,
    pub ball_decay: f32,
    pub ball_rand: f32,
    pub ball_size: f32,
    pub ball_speed_max: f32,
    pub ball_stuck_area: f32,
    pub ball_weight: f32,
    pub catch_ban_cycle: i32,
    pub catch_probability: f32,
    pub catchable_area_l: f32,
    pub catchable_area_w: f32,
    pub ckick_margin: f32,
    pub clang_advice_win: i32,
    pub clang_define_win: i32,
    pub clang_del_win: i32,
    pub clang_info_win: i32,
    pub clang_mess_delay: i32,
    pub clang_mess_per_cycle: i32,
    pub clang_meta_win: i32,
    pub clang_rule_win: i32,
    pub clang_win_size: i32,
    pub coach: i32,
    pub coach_port: i32,
    pub coach_w_referee: i32,
    pub connect_wait: i32,
    pub control_radius: f32,
    pub dash_power_rate: f32,
    pub drop_ball_time: i32,
    pub effort_dec: f32,
    pub effort_dec_thr: f32,
    pub effort_inc: f32,
    pub effort_inc_thr: f32,
    pub effort_init: f32,
    pub effort_min: f32,
    pub forbid_kick_off_offside: i32,
    pub free_kick_faults: i32,
    pub freeform_send_period: i32,
    pub freeform_wait_period: i32,
    pub fullstate_l: i32,
    pub fullstate_r: i32,
    pub game_log_compression: i32,
    pub game_log_dated: i32,
    pub game_log_dir: String,
    pub game_log_fixed: i32,
    pub game_log_fixed_name: String,
    pub game_log_version: i32,
    pub game_logging: i32,
    pub game_over_wait: i32,
    pub goal_width: f32,
    pub goalie_max_moves: i32,
    pub half_time: i32,
    pub hear_decay: f32,
    pub hear_inc: f32,
    pub hear_max: f32,
    pub inertia_moment: f32,
    pub keepaway: i32,
    pub keepaway_length: i32,
    pub keepaway_log_dated: i32,
    pub keepaway_log_dir: String,
    pub keepaway_log_fixed: i32,
    pub keepaway_log_fixed_name: String,
    pub keepaway_logging: i32,
    pub keepaway_start: i32,
    pub keepaway_width: i32,
    pub kick_off_wait: i32,
    pub kick_power_rate: f32,
    pub kick_rand: f32,
    pub kick_rand_factor_l: f32,
    pub kick_rand_factor_r: f32,
    pub kickable_margin: f32,
    pub landmark_file: String,
    pub log_date_format: String,
    pub log_times: i32,
    pub max_goal_kicks: i32,
    pub maxmoment: f32,
    pub maxneckang: f32,
    pub maxneckmoment: f32,
    pub maxpower: f32,
    pub minmoment: f32,
    pub minneckang: f32,
    pub minneckmoment: f32,
    pub minpower: f32,
    pub nr_extra_halfs: i32,
    pub nr_normal_halfs: i32,
    pub offside_active_area_size: f32,
    pub offside_kick_margin: f32,
    pub olcoach_port: i32,
    pub old_coach_hear: i32,
    pub pen_allow_mult_kicks: i32,
    pub pen_before_setup_wait: i32,
    pub pen_coach_moves_players: i32,
    pub pen_dist_x: f32,
    pub pen_max_extra_kicks: i32,
    pub pen_max_goalie_dist_x: f32,
    pub pen_nr_kicks: i32,
    pub pen_random_winner: i32,
    pub pen_ready_wait: i32,
    pub pen_setup_wait: i32,
    pub pen_taken_wait: i32,
    pub penalty_shoot_outs: i32,
    pub player_accel_max: f32,
    pub player_decay: f32,
    pub player_rand: f32,
    pub player_size: f32,
    pub player_speed_max: f32,
    pub player_weight: f32,
    pub point_to_ban: i32,
    pub point_to_duration: i32,
    pub port: i32,
    pub prand_factor_l: f32,
    pub prand_factor_r: f32,
    pub profile: i32,
    pub proper_goal_kicks: i32,
    pub quantize_step: f32,
    pub quantize_step_l: f32,
    pub record_messages: i32,
    pub recover_dec: f32,
    pub recover_dec_thr: f32,
    pub recover_init: f32,
    pub recover_min: f32,
    pub recv_step: u64,
    pub say_coach_cnt_max: i32,
    pub say_coach_msg_size: i32,
    pub say_msg_size: i32,
    pub send_comms: i32,
    pub send_step: u64,
    pub send_vi_step: u64,
    pub sense_body_step: u64,
    pub simulator_step: u64,
    pub slow_down_factor: f32,
    pub slowness_on_top_for_left_team: f32,
    pub slowness_on_top_for_right_team: f32,
    pub stamina_inc_max: f32,
    pub stamina_max: f32,
    pub start_goal_l: i32,
    pub start_goal_r: i32,
    pub stopped_ball_vel: f32,
    pub synch_micro_sleep: i32,
    pub synch_mode: i32,
    pub synch_offset: i32,
    pub tackle_back_dist: f32,
    pub tackle_cycles: i32,
    pub tackle_dist: f32,
    pub tackle_exponent: f32,
    pub tackle_power_rate: f32,
    pub tackle_width: f32,
    pub team_actuator_noise: i32,
    pub text_log_compression: i32,
    pub text_log_dated: i32,
    pub text_log_dir: String,
    pub text_log_fixed: i32,
    pub text_log_fixed_name: String,
    pub text_logging: i32,
    pub use_offside: i32,
    pub verbose: i32,
    pub visible_angle: f32,
    pub visible_distance: f32,
    pub wind_ang: f32,
    pub wind_dir: f32,
    pub wind_force: f32,
    pub wind_none: i32,
    pub wind_rand: f32,
    pub wind_random: i32,}

impl Default for ServerParameters {
    fn default() -> Self {
        ServerParameters {
            audio_cut_dist: 50.0,
            auto_mode: 0,
            back_passes: 1,
            ball_accel_max: 2.7,
            ball_decay: 0.94,
            ball_rand: 0.05,
            ball_size: 0.085,
            ball_speed_max: 2.7,
            ball_stuck_area: 3.0,
            ball_weight: 0.2,
            catch_ban_cycle: 5,
            catch_probability: 1.0,
            catchable_area_l: 2.0,
            catchable_area_w: 1.0,
            ckick_margin: 1.0,
            clang_advice_win: 1,
            clang_define_win: 1,
            clang_del_win: 1,
            clang_info_win: 1,
            clang_mess_delay: 50,
            clang_mess_per_cycle: 1,
            clang_meta_win: 1,
            clang_rule_win: 1,
            clang_win_size: 300,
            coach: 0,
            coach_port: 6001,
            coach_w_referee: 0,
            connect_wait: 300,
            control_radius: 2.0,
            dash_power_rate: 0.006,
            drop_ball_time: 200,
            effort_dec: 0.005,
            effort_dec_thr: 0.3,
            effort_inc: 0.01,
            effort_inc_thr: 0.6,
            effort_init: 1.0,
            effort_min: 0.6,
            forbid_kick_off_offside: 1,
            free_kick_faults: 1,
            freeform_send_period: 20,
            freeform_wait_period: 600,
            fullstate_l: 0,
            fullstate_r: 0,
            game_log_compression: 0,
            game_log_dated: 1,
            game_log_dir: "./".to_owned(),
            game_log_fixed: 0,
            game_log_fixed_name: "rcssserver".to_owned(),
            game_log_version: 3,
            game_logging: 1,
            game_over_wait: 100,
            goal_width: 14.02,
            goalie_max_moves: 2,
            half_time: 300,
            hear_decay: 1.0,
            hear_inc: 1.0,
            hear_max: 1.0,
            inertia_moment: 5.0,
            keepaway: 0,
            keepaway_length: 20,
            keepaway_log_dated: 1,
            keepaway_log_dir: "./".to_owned(),
            keepaway_log_fixed: 0,
            keepaway_log_fixed_name: "rcssserver".to_owned(),
            keepaway_logging: 1,
            keepaway_start: -1,
            keepaway_width: 20,
            kick_off_wait: 100,
            kick_power_rate: 0.027,
            kick_rand: 0.0,
            kick_rand_factor_l: 1.0,
            kick_rand_factor_r: 1.0,
            kickable_margin: 0.7,
            landmark_file: "~/.rcssserver-landmark.xml".to_owned(),
            log_date_format: "%Y%m%d%H%M-".to_owned(),
            log_times: 0,
            max_goal_kicks: 3,
            maxmoment: 180.0,
            maxneckang: 90.0,
            maxneckmoment: 180.0,
            maxpower: 100.0,
            minmoment: -180.0,
            minneckang: -90.0,
            minneckmoment: -180.0,
            minpower: -100.0,
            nr_extra_halfs: 2,
            nr_normal_halfs: 2,
            offside_active_area_size: 2.5,
            offside_kick_margin: 9.15,
            olcoach_port: 6002,
            old_coach_hear: 0,
            pen_allow_mult_kicks: 1,
            pen_before_setup_wait: 30,
            pen_coach_moves_players: 1,
            pen_dist_x: 42.5,
            pen_max_extra_kicks: 10,
            pen_max_goalie_dist_x: 14.0,
            pen_nr_kicks: 5,
            pen_random_winner: 0,
            pen_ready_wait: 50,
            pen_setup_wait: 100,
            pen_taken_wait: 200,
            penalty_shoot_outs: 1,
            player_accel_max: 1.0,
            player_decay: 0.4,
            player_rand: 0.1,
            player_size: 0.3,
            player_speed_max: 1.2,
            player_weight: 60.0,
            point_to_ban: 5,
            point_to_duration: 20,
            port: 6000,
            prand_factor_l: 1.0,
            prand_factor_r: 1.0,
            profile: 0,
            proper_goal_kicks: 0,
            quantize_step: 0.1,
            quantize_step_l: 0.01,
            record_messages: 0,
            recover_dec: 0.002,
            recover_dec_thr: 0.3,
            recover_init: 1.0,
            recover_min: 0.5,
            recv_step: 10,
            say_coach_cnt_max: 128,
            say_coach_msg_size: 128,
            say_msg_size: 10,
            send_comms: 0,
            send_step: 150,
            send_vi_step: 100,
            sense_body_step: 100,
            simulator_step: 100,
            slow_down_factor: 1.0,
            slowness_on_top_for_left_team: 1.0,
            slowness_on_top_for_right_team: 1.0,
            stamina_inc_max: 45.0,
            stamina_max: 4000.0,
            start_goal_l: 0,
            start_goal_r: 0,
            stopped_ball_vel: 0.01,
            synch_micro_sleep: 1,
            synch_mode: 0,
            synch_offset: 60,
            tackle_back_dist: 0.5,
            tackle_cycles: 10,
            tackle_dist: 2.0,
            tackle_exponent: 6.0,
            tackle_power_rate: 0.027,
            tackle_width: 1.0,
            team_actuator_noise: 0,
            text_log_compression: 0,
            text_log_dated: 1,
            text_log_dir: "./".to_owned(),
            text_log_fixed: 0,
            text_log_fixed_name: "rcssserver".to_owned(),
            text_logging: 1,
            use_offside: 1,
            verbose: 0,
            visible_angle: 90.0,
            visible_distance: 3.0,
            wind_ang: 0.0,
            wind_dir: 0.0,
            wind_force: 0.0,
            wind_none: 0,
            wind_rand: 0.0,
            wind_random: 0,
        }
    }
}

impl ServerParameters {
    /// Rejects tables the physics formulas cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("kickable_margin", self.kickable_margin),
            ("kick_power_rate", self.kick_power_rate),
            ("ball_speed_max", self.ball_speed_max),
            ("stamina_max", self.stamina_max),
        ];

        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }

        if !(0.0..1.0).contains(&self.ball_decay) {
            return Err(ConfigError::InvalidParameter {
                name: "ball_decay",
                reason: format!("must be in [0, 1), got {}", self.ball_decay),
            });
        }

        if self.minpower >= self.maxpower {
            return Err(ConfigError::InvalidParameter {
                name: "maxpower",
                reason: format!(
                    "maxpower ({}) must exceed minpower ({})",
                    self.maxpower, self.minpower
                ),
            });
        }

        if self.simulator_step == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "simulator_step",
                reason: "must be at least 1ms".to_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_table_is_valid() {
        let params = ServerParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.kickable_margin, 0.7);
        assert_eq!(params.simulator_step, 100);
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let params: ServerParameters =
            serde_yaml::from_str("kickable_margin: 1.0\nmaxpower: 120\n").unwrap();
        assert_eq!(params.kickable_margin, 1.0);
        assert_eq!(params.maxpower, 120.0);
        assert_eq!(params.ball_decay, 0.94);
    }

    #[test]
    fn non_positive_kickable_margin_is_rejected() {
        let params = ServerParameters {
            kickable_margin: 0.0,
            ..ServerParameters::default()
        };
        match params.validate() {
            Err(ConfigError::InvalidParameter { name, .. }) => assert_eq!(name, "kickable_margin"),
            other => panic!("expected invalid parameter, got {:?}", other),
        }
    }

    #[test]
    fn inverted_power_range_is_rejected() {
        let params = ServerParameters {
            minpower: 100.0,
            maxpower: -100.0,
            ..ServerParameters::default()
        };
        assert!(params.validate().is_err());
    }
}
