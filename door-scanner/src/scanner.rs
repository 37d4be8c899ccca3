use crate::navigation::{Decision, NavigationPolicy, ScanPhase};
use anyhow::{Context, Result};
use door_inference::{DoorClassify, DoorDetector, FrameDetection};
use door_media::capture::FrameSource;
use door_media::display::FrameDisplay;
use door_media::overlay::UnLocked;
use door_media::{Frame, Overlay, BGR};
use door_motion::{MotionActuator, Settle};
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

const BOX_THICKNESS: i32 = 3;
const TEXT_SCALE: f64 = 0.7;
const TEXT_THICKNESS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    EndOfStream,
    QuitRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub exit: LoopExit,
    pub frames: u64,
    pub phase: ScanPhase,
}

/// The capture → detect → decide → actuate → display loop.
pub struct DoorScanner<S, D, C, A>
where
    S: FrameSource,
    D: FrameDisplay,
    C: DoorClassify,
    A: MotionActuator,
{
    source: S,
    display: D,
    detector: DoorDetector<C>,
    policy: NavigationPolicy,
    actuator: A,
    phase: ScanPhase,
    shutdown: Arc<AtomicBool>,
    frames: u64,
}

impl<S, D, C, A> DoorScanner<S, D, C, A>
where
    S: FrameSource,
    D: FrameDisplay,
    C: DoorClassify,
    A: MotionActuator,
{
    pub fn new(
        source: S,
        display: D,
        detector: DoorDetector<C>,
        policy: NavigationPolicy,
        actuator: A,
    ) -> Self {
        Self {
            source,
            display,
            detector,
            policy,
            actuator,
            phase: ScanPhase::Scanning,
            shutdown: Arc::new(AtomicBool::new(false)),
            frames: 0,
        }
    }

    /// Flag polled once per frame; setting it ends the loop like the quit key does.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// Runs until the stream ends, the operator quits, or a step fails. The robot is
    /// stopped and the capture released on every exit.
    pub fn run(mut self) -> Result<ScanSummary> {
        let result = self.run_loop();

        let stopped = self.actuator.shutdown().context("Failed to stop the robot base");
        let released = self.source.release().context("Failed to release capture");

        let exit = match result {
            Ok(exit) => exit,
            Err(e) => {
                for cleanup in [stopped, released].into_iter().filter_map(Result::err) {
                    error!("{cleanup:#}");
                }
                return Err(e);
            }
        };
        stopped?;
        released?;

        info!("Scanner finished after {} frames ({exit:?})", self.frames);
        Ok(ScanSummary {
            exit,
            frames: self.frames,
            phase: self.phase,
        })
    }

    fn run_loop(&mut self) -> Result<LoopExit> {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                return Ok(LoopExit::QuitRequested);
            }

            let tic = Instant::now();
            let Some(frame) = self.source.read_frame()? else {
                return Ok(LoopExit::EndOfStream);
            };

            self.step(&frame, tic)?;

            if self.display.quit_requested()? {
                info!("Quit requested by operator");
                return Ok(LoopExit::QuitRequested);
            }
        }
    }

    fn step(&mut self, frame: &Frame, tic: Instant) -> Result<Decision> {
        self.frames += 1;

        let detection = self.detector.detect(frame)?;
        let overlay = self.annotate(frame, &detection);
        let elapsed = tic.elapsed().as_secs_f64();

        let decision = self.policy.decide(detection.vector, self.phase);
        self.log_decision(&detection, &decision);
        if decision.phase != self.phase {
            info!("Phase {:?} -> {:?}", self.phase, decision.phase);
        }
        self.phase = decision.phase;

        if let Some(correction) = decision.correction {
            self.actuator.execute(correction, Settle::Correction)?;
        }
        self.actuator.execute(decision.command, Settle::Standard)?;

        let fps = if elapsed > 0.0 { 1.0 / elapsed } else { 0.0 };
        let height = frame.get_height() as i32;
        let overlay = overlay
            .draw_text(format!("{fps:.2} FPS"), (10, height - 10), TEXT_SCALE, BGR::GREEN, TEXT_THICKNESS)
            .build();
        self.display.show(frame, &overlay)?;

        Ok(decision)
    }

    fn annotate(&self, frame: &Frame, detection: &FrameDetection) -> Overlay<UnLocked> {
        let threshold = self.detector.config().threshold;
        let height = frame.get_height() as i32;
        let mut overlay = Overlay::builder(frame.get_size());

        for score in &detection.scores {
            let color = if score.is_positive(threshold) {
                BGR::GREEN
            } else {
                BGR::RED
            };
            let left = score.bounds.left as i32;
            let right = score.bounds.right as i32;

            overlay = overlay
                .draw_rect((left, 0), (right, height), color, BOX_THICKNESS)
                .draw_text(
                    format!("{:.2}%", score.confidence * 100.0),
                    (left + 20, 30),
                    TEXT_SCALE,
                    color,
                    TEXT_THICKNESS,
                );
        }

        overlay
    }

    fn log_decision(&self, detection: &FrameDetection, decision: &Decision) {
        let vector = detection.vector;
        match decision.correction {
            Some(correction) => info!(
                "Frame {} {vector}: {} ({correction} first, then {})",
                self.frames, decision.maneuver, decision.command
            ),
            None => info!("Frame {} {vector}: {} ({})", self.frames, decision.maneuver, decision.command),
        }
    }
}
