//! The session orchestrator: intro cutscene, timed main loop, ending.
//!
//! A `Session` is driven from outside by one `tick(dt)` per frame plus the
//! player inputs. Everything it decides is reported through its `Presenter`.

use log::{debug, info};
use std::sync::Arc;

use crate::core::config::SessionConfig;
use crate::core::cooldown::ActionCooldown;
use crate::core::cursor::NarrativeCursor;
use crate::core::ending::EndingResolver;
use crate::core::meter::{MeterChange, ResourceMeter};
use crate::core::pacing::{PacingController, PacingStep};
use crate::core::store::NarrativeStore;
use crate::core::timer::Interval;
use crate::schema::node::Channel;
use crate::schema::notification::Presenter;
use crate::schema::phase::{Ending, SessionPhase};

/// Why the main loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    MeterExhausted,
    DialogueExhausted,
    PlayerLogExhausted,
}

pub struct Session<P: Presenter> {
    store: Arc<NarrativeStore>,
    config: SessionConfig,
    presenter: P,
    phase: SessionPhase,
    dialogue: NarrativeCursor,
    player_log: NarrativeCursor,
    meter: ResourceMeter,
    pacing: PacingController,
    intro_timer: Interval,
    cooldown: ActionCooldown,
    resolver: EndingResolver,
    ending: Option<Ending>,
    end_reason: Option<EndReason>,
    final_meter: Option<f32>,
    finished: bool,
}

impl<P: Presenter> Session<P> {
    /// Start a new session in the intro phase and show the first intro line.
    pub fn new(store: Arc<NarrativeStore>, config: SessionConfig, presenter: P) -> Self {
        let entries = *store.entries();
        let mut session = Session {
            meter: ResourceMeter::new(
                config.initial_meter,
                config.decay_per_tick,
                config.gain_per_action,
            ),
            intro_timer: Interval::new(config.intro_interval),
            cooldown: ActionCooldown::new(config.action_cooldown),
            resolver: EndingResolver::new(config.thresholds),
            dialogue: NarrativeCursor::new(Channel::Dialogue, Some(entries.intro)),
            player_log: NarrativeCursor::new(Channel::PlayerLog, Some(entries.player_log)),
            pacing: PacingController::new(),
            phase: SessionPhase::Intro,
            ending: None,
            end_reason: None,
            final_meter: None,
            finished: false,
            store,
            config,
            presenter,
        };
        info!("session started");
        session.presenter.phase_changed(SessionPhase::Intro);
        session.render_dialogue();
        session
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn meter(&self) -> &ResourceMeter {
        &self.meter
    }

    pub fn dialogue_cursor(&self) -> &NarrativeCursor {
        &self.dialogue
    }

    pub fn player_log_cursor(&self) -> &NarrativeCursor {
        &self.player_log
    }

    pub fn cooldown(&self) -> &ActionCooldown {
        &self.cooldown
    }

    pub fn is_pacing(&self) -> bool {
        self.pacing.is_running()
    }

    pub fn ending(&self) -> Option<Ending> {
        self.ending
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Meter value captured at the moment the main loop ended.
    pub fn final_meter(&self) -> Option<f32> {
        self.final_meter
    }

    /// True once the ending chain has been read through.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn store(&self) -> &NarrativeStore {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// Advance every running schedule by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        match self.phase {
            SessionPhase::Intro => self.tick_intro(dt),
            SessionPhase::MainLoop => self.tick_main_loop(dt),
            SessionPhase::Ended => {}
        }
    }

    /// Cut the intro short. Ignored outside the intro.
    pub fn skip_intro(&mut self) {
        if self.phase == SessionPhase::Intro {
            debug!("intro skipped");
            self.enter_main_loop();
        }
    }

    /// The player pressed the action button. Only counts during the main
    /// loop and while the button is off cooldown.
    pub fn player_action(&mut self) {
        if self.phase != SessionPhase::MainLoop {
            debug!("player action ignored during {}", self.phase.name());
            return;
        }
        if !self.cooldown.try_trigger() {
            debug!("player action ignored, button cooling down");
            return;
        }
        if !self.cooldown.is_ready() {
            self.presenter.action_ready(false);
        }

        let change = self.meter.gain_event();
        self.report_meter(change);

        if self.player_log.is_at_end(self.store.player_logs()) {
            return;
        }
        self.player_log.advance(self.store.player_logs());
        self.render_player_log();
        if self.player_log.is_at_end(self.store.player_logs()) {
            self.end(EndReason::PlayerLogExhausted);
        }
    }

    /// Read the next line of the ending. Ignored before the session has
    /// ended; the intro and main loop are timed.
    pub fn next_dialogue(&mut self) {
        if self.phase != SessionPhase::Ended || self.finished {
            return;
        }
        if self.dialogue.is_at_end(self.store.dialogues()) {
            self.finished = true;
            if let Some(ending) = self.ending {
                info!("{} ending read through", ending.name());
                self.presenter.session_finished(ending);
            }
        } else {
            self.dialogue.advance(self.store.dialogues());
            self.render_dialogue();
        }
    }

    fn tick_intro(&mut self, dt: f32) {
        if !self.intro_timer.poll(dt) {
            return;
        }
        if self.dialogue.is_at_end(self.store.dialogues()) {
            self.enter_main_loop();
        } else {
            self.dialogue.advance(self.store.dialogues());
            self.render_dialogue();
        }
    }

    fn enter_main_loop(&mut self) {
        let entries = *self.store.entries();
        self.phase = SessionPhase::MainLoop;
        info!("entering main loop");
        self.presenter.phase_changed(SessionPhase::MainLoop);

        self.dialogue.reset(Some(entries.main_loop));
        self.player_log.reset(Some(entries.player_log));
        self.render_player_log();
        self.presenter.render_meter(self.meter.snapshot());
        self.presenter.action_ready(self.cooldown.is_ready());

        self.meter.start_decay(self.config.decay_interval);
        if self.pacing.start(self.config.pacing_interval) {
            self.render_dialogue();
        }
    }

    fn tick_main_loop(&mut self, dt: f32) {
        if self.cooldown.tick(dt) {
            self.presenter.action_ready(true);
        }

        // Decay first so an empty meter ends the loop before a stale advance.
        if let Some(change) = self.meter.tick(dt) {
            self.report_meter(change);
            if self.phase == SessionPhase::Ended {
                return;
            }
        }

        if self.pacing.tick(dt) == PacingStep::Due {
            self.dialogue.advance(self.store.dialogues());
            if self.dialogue.is_at_end(self.store.dialogues()) {
                self.end(EndReason::DialogueExhausted);
            } else {
                self.render_dialogue();
            }
        }
    }

    fn report_meter(&mut self, change: MeterChange) {
        if change.changed() {
            self.presenter.render_meter(change.value);
        }
        if change.exhausted {
            self.end(EndReason::MeterExhausted);
        }
    }

    fn end(&mut self, reason: EndReason) {
        if self.phase != SessionPhase::MainLoop {
            return;
        }
        let snapshot = self.meter.snapshot();
        self.pacing.stop();
        self.meter.stop_decay();
        self.cooldown.disable();

        let ending = self.resolver.resolve(snapshot);
        info!(
            "main loop over ({:?}) with meter at {}, {} ending",
            reason,
            snapshot,
            ending.name()
        );
        self.phase = SessionPhase::Ended;
        self.ending = Some(ending);
        self.end_reason = Some(reason);
        self.final_meter = Some(snapshot);

        let entries = *self.store.entries();
        self.dialogue.reset(Some(entries.ending(ending)));

        self.presenter.phase_changed(SessionPhase::Ended);
        self.presenter.action_ready(false);
        self.presenter.ending_selected(ending);
        if ending == Ending::Losing {
            if let Some(log) = entries.losing_player_log {
                self.player_log.reset(Some(log));
                self.render_player_log();
            }
        }
        self.render_dialogue();
    }

    fn render_dialogue(&mut self) {
        if let Some(id) = self.dialogue.active() {
            if let Some(node) = self.store.dialogue(id) {
                self.presenter.render_dialogue(id, node);
            }
        }
    }

    fn render_player_log(&mut self) {
        if let Some(id) = self.player_log.active() {
            if let Some(node) = self.store.player_log(id) {
                self.presenter.render_player_log(id, node);
            }
        }
    }
}
