//! Page flow: event dispatch, celebration overlay and timer tasks
//!
//! `Flow` owns the navigator, the evasion controller and the timer queue.
//! The host feeds it `FlowEvent`s as they arrive and calls `tick` once the
//! clock passes `next_deadline()`. Nothing here sleeps or spawns timers.

use glam::Vec2;

use crate::evasion::{ButtonHost, EvasionController, FleeOutcome, PointerKind};
use crate::nav::{Navigator, ScreenHost};
use crate::random::RandomSource;
use crate::scheduler::{Scheduler, TaskId};
use crate::tuning::Tuning;

/// Visibility of the "correct answer" overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CelebrationPhase {
    #[default]
    Hidden,
    /// Overlay fully visible
    Shown,
    /// Fade-out running; still on screen
    Fading,
}

/// Everything the flow needs from the page
pub trait Stage: ScreenHost + ButtonHost {
    fn set_celebration(&mut self, phase: CelebrationPhase);
}

/// User input, already translated from host events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowEvent {
    /// A `[data-next]` button (the intro's Start)
    NextClicked,
    /// Any quiz option; every answer is correct. Ignored while a
    /// celebration is already running, so one celebration advances once.
    OptionClicked,
    /// The Yes button
    AcceptClicked,
    /// First layout pass finished; element geometry is available
    LayoutReady,
    /// Mouse moved over the Yes/No container (client coordinates)
    PointerMoved(Vec2),
    /// Finger moved over the Yes/No container
    TouchMoved(Vec2),
    /// Mouse entered the No button; coordinates if the event had them
    DeclineHovered(Option<Vec2>),
    /// Finger landed on the No button
    DeclineTouched(Vec2),
    /// The No button received a click
    DeclineClicked,
}

/// Delayed work queued by the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowTask {
    /// Hold elapsed: start fading the overlay
    FadeCelebration,
    /// Fade elapsed: hide the overlay and advance
    FinishCelebration,
}

/// The whole page flow
#[derive(Debug)]
pub struct Flow<R> {
    navigator: Navigator,
    evasion: EvasionController<R>,
    scheduler: Scheduler<FlowTask>,
    celebration: CelebrationPhase,
    celebration_task: Option<TaskId>,
    hold_ms: f64,
    fade_ms: f64,
    evasion_screen: String,
    final_screen: String,
}

impl<R: RandomSource> Flow<R> {
    pub fn new(tuning: Tuning, rng: R) -> Self {
        let tuning = tuning.validated();
        Self {
            navigator: Navigator::new(tuning.screen_order.clone()),
            scheduler: Scheduler::new(),
            celebration: CelebrationPhase::Hidden,
            celebration_task: None,
            hold_ms: tuning.celebration_hold_ms,
            fade_ms: tuning.celebration_fade_ms,
            evasion_screen: tuning.evasion_screen.clone(),
            final_screen: tuning.final_screen.clone(),
            evasion: EvasionController::new(tuning, rng),
        }
    }

    /// Show the first screen and hide the overlay
    pub fn start(&mut self, stage: &mut impl Stage) {
        self.navigator.start(stage);
        self.celebration = CelebrationPhase::Hidden;
        stage.set_celebration(CelebrationPhase::Hidden);
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn evasion(&self) -> &EvasionController<R> {
        &self.evasion
    }

    pub fn celebration(&self) -> CelebrationPhase {
        self.celebration
    }

    /// Whether a celebration hold or fade is still queued
    pub fn celebration_pending(&self) -> bool {
        self.celebration_task
            .is_some_and(|id| self.scheduler.is_pending(id))
    }

    /// Whether the Yes/No screen is the active one
    pub fn evasion_active(&self) -> bool {
        self.navigator.is_active(&self.evasion_screen)
    }

    /// When `tick` next has work to do
    pub fn next_deadline(&self) -> Option<f64> {
        self.scheduler.next_deadline()
    }

    /// Process one input event. Returns the flee if the event moved the No
    /// button.
    pub fn handle(
        &mut self,
        stage: &mut impl Stage,
        event: FlowEvent,
        now_ms: f64,
    ) -> Option<FleeOutcome> {
        let active = self.evasion_active();
        match event {
            FlowEvent::NextClicked => {
                self.navigator.advance(stage);
                None
            }
            FlowEvent::OptionClicked => {
                self.celebrate(stage, now_ms);
                None
            }
            FlowEvent::AcceptClicked => {
                log::info!("Yes! ({} No attempts)", self.evasion.attempts());
                let target = self.final_screen.clone();
                self.navigator.jump_to(stage, &target);
                None
            }
            FlowEvent::LayoutReady => {
                self.evasion.place_initially(stage);
                None
            }
            FlowEvent::PointerMoved(pos) => {
                self.evasion
                    .evaluate_proximity(stage, pos, PointerKind::Mouse, active, now_ms)
            }
            FlowEvent::TouchMoved(pos) => {
                self.evasion
                    .evaluate_proximity(stage, pos, PointerKind::Touch, active, now_ms)
            }
            FlowEvent::DeclineHovered(pos) => self.evasion.hover(stage, pos, active, now_ms),
            FlowEvent::DeclineTouched(pos) => {
                self.evasion.touch_start(stage, pos, active, now_ms)
            }
            FlowEvent::DeclineClicked => self.evasion.click(stage, active, now_ms),
        }
    }

    /// Run every task due at or before `now_ms`. Returns how many ran.
    pub fn tick(&mut self, stage: &mut impl Stage, now_ms: f64) -> usize {
        let mut ran = 0;
        while let Some((due_ms, task)) = self.scheduler.pop_due(now_ms) {
            self.run_task(stage, task, due_ms);
            ran += 1;
        }
        ran
    }

    /// Drop pending timers (page teardown)
    pub fn shutdown(&mut self) -> usize {
        self.celebration_task = None;
        let dropped = self.scheduler.cancel_all();
        if dropped > 0 {
            log::info!("Cancelled {} pending timer(s)", dropped);
        }
        dropped
    }

    fn celebrate(&mut self, stage: &mut impl Stage, now_ms: f64) {
        if self.celebration != CelebrationPhase::Hidden {
            log::debug!("Celebration already running, option click ignored");
            return;
        }
        self.celebration = CelebrationPhase::Shown;
        stage.set_celebration(CelebrationPhase::Shown);
        self.celebration_task =
            Some(self.scheduler.schedule(now_ms + self.hold_ms, FlowTask::FadeCelebration));
    }

    // Follow-up tasks are scheduled from the due time, not the tick time,
    // so the overall delay is exactly hold + fade.
    fn run_task(&mut self, stage: &mut impl Stage, task: FlowTask, due_ms: f64) {
        match task {
            FlowTask::FadeCelebration => {
                self.celebration = CelebrationPhase::Fading;
                stage.set_celebration(CelebrationPhase::Fading);
                self.celebration_task = Some(
                    self.scheduler
                        .schedule(due_ms + self.fade_ms, FlowTask::FinishCelebration),
                );
            }
            FlowTask::FinishCelebration => {
                self.celebration = CelebrationPhase::Hidden;
                self.celebration_task = None;
                stage.set_celebration(CelebrationPhase::Hidden);
                self.navigator.advance(stage);
            }
        }
    }
}
