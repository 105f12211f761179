use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::{
    channel::message::response_message,
    config::runtime_config::RuntimeConfig,
    host::static_page::StaticPage,
    overlay::{
        engine::OverlayEngine,
        engine_model::EngineEvent,
        geometry::Viewport,
        host::HitTarget,
    },
    replay::{
        context::ReplayContext,
        replay_model::{Expectation, ExpectationResult, ReplayResult, ReplayScript, ReplayStep},
    },
    toggle::store::{KeyValueStore, MemoryStore},
    trace::{logger::TraceLogger, trace::TraceEvent},
};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read script '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse script '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("node {0} does not exist on the page")]
    UnknownNode(u64),
}

/// Drives an `OverlayEngine` over a `StaticPage`, step by step.
pub struct ReplayRunner;

struct Session<'a> {
    engine: OverlayEngine,
    page: StaticPage,
    tracer: &'a TraceLogger,
    ctx: ReplayContext,
}

impl ReplayRunner {
    /// Load a script. YAML is a superset of JSON, so both parse.
    pub fn load(path: &str) -> Result<ReplayScript, ReplayError> {
        let content = std::fs::read_to_string(path).map_err(|e| ReplayError::Read {
            path: path.to_string(),
            source: e,
        })?;
        serde_yaml::from_str(&content).map_err(|e| ReplayError::Parse {
            path: path.to_string(),
            source: e,
        })
    }

    pub fn run(script: &ReplayScript, tracer: &TraceLogger) -> ReplayResult {
        let config = RuntimeConfig::from_options(&script.options);
        let mut store = MemoryStore::new();
        if let Some(enabled) = script.stored_enabled {
            let _ = store.set(&config.storage_key, if enabled { "true" } else { "false" });
        }

        let mut page_spec = script.page.clone();
        page_spec.location_attribute = config.attribute_source_location.clone();

        let mut session = Session {
            engine: OverlayEngine::new(config, Box::new(store)),
            page: StaticPage::new(page_spec),
            tracer,
            ctx: ReplayContext::new(),
        };

        for (i, step) in script.steps.iter().enumerate() {
            if let Err(e) = session.execute(step, i) {
                return ReplayResult {
                    script_name: script.name.clone(),
                    passed: false,
                    steps_run: i + 1,
                    expectation_results: session.ctx.expectation_results,
                    error: Some(format!("Step {} failed: {}", i, e)),
                };
            }
        }

        info!(
            script = %script.name,
            events = session.ctx.events_dispatched,
            failures = session.ctx.fail_count(),
            "replay finished"
        );

        ReplayResult {
            script_name: script.name.clone(),
            passed: session.ctx.all_passed(),
            steps_run: script.steps.len(),
            expectation_results: session.ctx.expectation_results,
            error: None,
        }
    }
}

impl Session<'_> {
    fn execute(&mut self, step: &ReplayStep, step_index: usize) -> Result<(), ReplayError> {
        match step {
            ReplayStep::Hover { node } => {
                let target = self.located(*node)?;
                self.dispatch(EngineEvent::PointerOver { target });
            }
            ReplayStep::Leave { to, overlay } => {
                let related = match (to, overlay) {
                    (_, Some(part)) => Some(HitTarget::Overlay { part: *part }),
                    (Some(node), None) => Some(self.located(*node)?),
                    (None, None) => None,
                };
                self.dispatch(EngineEvent::PointerOut { related });
            }
            ReplayStep::EnterForm => self.dispatch(EngineEvent::PointerEnterForm),
            ReplayStep::Click { node } => {
                let target = match node {
                    Some(node) => self.located(*node)?,
                    None => HitTarget::Plain,
                };
                self.dispatch(EngineEvent::Click { target });
            }
            ReplayStep::ClickOverlay { part } => {
                self.dispatch(EngineEvent::Click {
                    target: HitTarget::Overlay { part: *part },
                });
            }
            ReplayStep::Type { text } => self.dispatch(EngineEvent::FormInput {
                value: text.clone(),
            }),
            ReplayStep::Key { key } => self.dispatch(EngineEvent::FormKey { key: *key }),
            ReplayStep::Submit => self.dispatch(EngineEvent::SubmitClicked),
            ReplayStep::Close => self.dispatch(EngineEvent::CloseClicked),
            ReplayStep::ClickBadge => self.dispatch(EngineEvent::BadgeClicked),
            ReplayStep::Shortcut { chord } => self.dispatch(EngineEvent::KeyDown {
                chord: chord.clone(),
            }),
            ReplayStep::Respond { success, error } => {
                let data = response_message(self.engine.config(), *success, error.as_deref());
                self.dispatch(EngineEvent::Message { data });
            }
            ReplayStep::Message { data } => {
                self.dispatch(EngineEvent::Message { data: data.clone() });
            }
            ReplayStep::Advance { ms } => {
                for timer in self.page.advance(Duration::from_millis(*ms)) {
                    self.dispatch(EngineEvent::TimerFired { timer });
                }
            }
            ReplayStep::Scroll { x, y } => {
                self.page.scroll_to(*x, *y);
                self.dispatch(EngineEvent::Scroll);
            }
            ReplayStep::Resize { width, height } => {
                self.page.resize(Viewport {
                    width: *width,
                    height: *height,
                });
                self.dispatch(EngineEvent::Resize);
            }
            ReplayStep::MoveNode { node, rect } => {
                self.located(*node)?;
                self.page.move_node(*node, *rect);
                self.dispatch(EngineEvent::Scroll);
            }
            ReplayStep::Enable => self.engine.enable(&mut self.page),
            ReplayStep::Disable => self.engine.disable(&mut self.page),
            ReplayStep::Toggle => self.engine.toggle(&mut self.page),
            ReplayStep::SetLanguage { language } => self.engine.set_language(language),
            ReplayStep::Expect { assertions } => {
                let results = assertions
                    .iter()
                    .map(|spec| self.evaluate(spec, step_index))
                    .collect();
                self.ctx.record(results);
            }
        }
        Ok(())
    }

    fn located(&self, node: u64) -> Result<HitTarget, ReplayError> {
        if !self.page.has_node(node) {
            return Err(ReplayError::UnknownNode(node));
        }
        Ok(self.page.target(node))
    }

    fn dispatch(&mut self, event: EngineEvent) {
        let trace = TraceEvent::now(self.ctx.events_dispatched, &event, &self.engine.phase());
        self.ctx.events_dispatched += 1;

        let dispatch = self.engine.handle(event, &mut self.page);
        self.tracer.log(&trace.with_outcome(&self.engine.phase(), dispatch));
    }

    fn evaluate(&self, spec: &Expectation, step_index: usize) -> ExpectationResult {
        let scene = self.engine.scene();
        let form = scene.form.as_ref();

        let (passed, actual) = match spec {
            Expectation::Phase { expected } => {
                let phase = self.engine.phase();
                (phase.name() == expected.as_str(), phase.name().to_string())
            }
            Expectation::Selected { expected } => {
                let actual = scene.selected_location().map(str::to_string);
                (actual == *expected, format!("{:?}", actual))
            }
            Expectation::HoverCount { expected } => compare(*expected, scene.hover_count()),
            Expectation::SelectionCount { expected } => compare(*expected, scene.selection_count()),
            Expectation::FormOpen { expected } => compare(*expected, form.is_some()),
            Expectation::FormInput { expected } => {
                let actual = form.map(|f| f.input.clone()).unwrap_or_default();
                (actual == *expected, actual)
            }
            Expectation::SubmitEnabled { expected } => {
                compare(*expected, form.is_some_and(|f| f.submit_enabled()))
            }
            Expectation::Busy { expected } => compare(*expected, form.is_some_and(|f| f.busy())),
            Expectation::Enabled { expected } => compare(*expected, self.engine.is_enabled()),
            Expectation::Placeholder { expected } => {
                let actual = form.map(|f| f.placeholder.clone()).unwrap_or_default();
                (actual == *expected, actual)
            }
            Expectation::Posted { expected } => compare(*expected, self.page.posted().len()),
            Expectation::Broadcasts { expected } => compare(*expected, self.page.broadcasts().len()),
            Expectation::PendingTimers { expected } => compare(*expected, self.page.pending_timers()),
            Expectation::TimersStarted { expected } => compare(*expected, self.page.timers_started()),
        };

        ExpectationResult {
            step_index,
            spec: spec.clone(),
            passed,
            message: if passed {
                None
            } else {
                Some(format!("{} expectation not met", spec.name()))
            },
            actual: Some(actual),
        }
    }
}

fn compare<T: PartialEq + std::fmt::Debug>(expected: T, actual: T) -> (bool, String) {
    (expected == actual, format!("{:?}", actual))
}

