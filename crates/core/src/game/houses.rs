//! House safe zones: the stay countdown while occupied and the cooldown after leaving.

use tracing::debug;

use super::*;

impl GameSession {
    pub(super) fn enter_house(&mut self, house: HouseId) {
        self.state.player.in_house = Some(house);
        self.state.house_stay_remaining = self.rules.house_stay_secs;
        cancel_slot(&mut self.scheduler, &mut self.timers.house_stay);
        self.timers.house_stay =
            Some(self.scheduler.arm_periodic(TimerKind::HouseStay, self.rules.countdown_tick_ms));
        debug!(house = house.0, budget = self.rules.house_stay_secs, "player entered house");
        self.log.push(LogEvent::HouseEntered { house });
    }

    pub(super) fn leave_house(&mut self, house: HouseId) {
        cancel_slot(&mut self.scheduler, &mut self.timers.house_stay);
        self.state.player.in_house = None;
        self.state.house_stay_remaining = 0;

        if let Some(record) = self.state.houses.get_mut(house.0) {
            record.cooldown_remaining = self.rules.house_cooldown_secs;
        }
        self.arm_cooldown_timer(house);
        debug!(house = house.0, cooldown = self.rules.house_cooldown_secs, "player left house");
        self.log.push(LogEvent::HouseLeft { house });
    }

    pub(super) fn arm_cooldown_timer(&mut self, house: HouseId) {
        self.cancel_cooldown_timer(house);
        let key = self
            .scheduler
            .arm_periodic(TimerKind::HouseCooldown(house), self.rules.countdown_tick_ms);
        if let Some(slot) = self.timers.house_cooldowns.get_mut(house.0) {
            *slot = Some(key);
        }
    }

    /// Overstaying is lost, not evicted.
    pub(super) fn tick_house_stay(&mut self) {
        if self.state.status != SessionStatus::Running {
            return;
        }
        self.state.house_stay_remaining = self.state.house_stay_remaining.saturating_sub(1);
        if self.state.house_stay_remaining == 0 {
            cancel_slot(&mut self.scheduler, &mut self.timers.house_stay);
            self.lose_level(LossCause::HouseOverstay);
        }
    }

    pub(super) fn tick_house_cooldown(&mut self, house: HouseId) {
        let Some(record) = self.state.houses.get_mut(house.0) else {
            return;
        };
        record.cooldown_remaining = record.cooldown_remaining.saturating_sub(1);
        if record.cooldown_remaining == 0 {
            self.cancel_cooldown_timer(house);
            self.log.push(LogEvent::HouseCooledDown { house });
        }
    }

    /// Re-arms the stay countdown and every unfinished cooldown from their stored values.
    pub(super) fn rearm_house_timers(&mut self) {
        if self.state.player.in_house.is_some() && self.state.house_stay_remaining > 0 {
            self.timers.house_stay = Some(
                self.scheduler.arm_periodic(TimerKind::HouseStay, self.rules.countdown_tick_ms),
            );
        }
        let cooling: Vec<HouseId> = self
            .state
            .houses
            .iter()
            .filter(|house| !house.is_free())
            .map(|house| house.id)
            .collect();
        for house in cooling {
            self.arm_cooldown_timer(house);
        }
    }
}
