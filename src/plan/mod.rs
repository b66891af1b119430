//! Reconciliation engine
//!
//! Walks the baseline profile section by section, compares each attribute with
//! the target, and emits the key actions that move the editor from one to the
//! other. The editor gives no feedback, so the planner keeps its own
//! [`NavState`] and updates it for every action it emits.

use anyhow::Result;
use serde::Serialize;

use crate::encode::{encode, Action, PrimitiveEvent, Timing};
use crate::profile::{Profile, Section, SectionName, UNSET};
use crate::propagate::{propagate, Adjustment, ClampPolicy, ClampTable, DependencyTable};
use crate::sink::{RecordingSink, Sink};

pub mod classify;
pub mod state;

pub use classify::{classify, AttributeKind};
pub use state::{Location, NavState};

pub const COMPLETE_MESSAGE: &str = "Reconciliation complete!";

/// Fixed inputs for a run. Constant for the planner's lifetime.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub timing: Timing,
    pub dependencies: DependencyTable,
    pub clamp: ClampTable,
    /// Name fragment → target multiplier, for sliders whose step is half a unit.
    pub attribute_scales: Vec<(String, i32)>,
    /// Target value that switches a toggle or flag row on.
    pub activation_value: i32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            dependencies: DependencyTable::default(),
            clamp: ClampTable::default(),
            attribute_scales: vec![("chest_shape".to_string(), 2)],
            activation_value: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    /// The sink asked to stop; the editor is left between two rows.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Everything a run produced, for callers that don't stream.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub events: Vec<PrimitiveEvent>,
    pub log: Vec<String>,
    pub outcome: Outcome,
}

pub struct Planner<'a> {
    baseline: Profile,
    working: Profile,
    target: &'a Profile,
    settings: EngineSettings,
    state: NavState,
}

impl<'a> Planner<'a> {
    pub fn new(baseline: Profile, target: &'a Profile, settings: EngineSettings) -> Self {
        let state = initial_state(&baseline);
        Self { working: baseline.clone(), baseline, target, settings, state }
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    /// The baseline as updated by the decisions made so far.
    pub fn working(&self) -> &Profile {
        &self.working
    }

    /// Run the whole traversal, pushing events into `sink` as they are decided.
    pub fn run<S: Sink + ?Sized>(&mut self, sink: &mut S) -> Result<Outcome> {
        self.working = self.baseline.clone();
        self.state = initial_state(&self.baseline);

        let names: Vec<String> =
            self.baseline.sections().iter().map(|s| s.name().to_string()).collect();

        for name in &names {
            if sink.stop_requested() {
                sink.log(&format!("Stop requested, halting before section '{}'", name));
                return Ok(Outcome::Stopped);
            }
            if self.visit_section(name, sink)? == Flow::Stop {
                return Ok(Outcome::Stopped);
            }
        }

        sink.log(COMPLETE_MESSAGE);
        sink.complete();
        Ok(Outcome::Completed)
    }

    /// Collect a full run into memory.
    pub fn plan(mut self) -> Result<Plan> {
        let mut sink = RecordingSink::new();
        let outcome = self.run(&mut sink)?;
        Ok(Plan { events: sink.events, log: sink.log, outcome })
    }

    /// Process one baseline section.
    pub fn visit_section<S: Sink + ?Sized>(&mut self, name: &str, sink: &mut S) -> Result<Flow> {
        let parsed = SectionName::parse(name);
        tracing::debug!("Going through {} on page {}", name, self.state.page);

        if parsed.secondary && !self.state.edit_active {
            tracing::debug!("Skipping {} as its edit toggle is off", name);
            return Ok(Flow::Continue);
        }
        // Unlocked by the toggle just above; the cursor is already inside.
        let continuing = parsed.secondary;

        if !parsed.secondary && self.state.edit_active {
            // The previous section unlocked a secondary the baseline doesn't have.
            self.state.edit_active = false;
            if parsed.page == self.state.page && self.state.in_category() {
                self.perform(Action::LeaveSection, sink)?;
                self.state.location = Location::Top;
            }
        }

        if parsed.page != self.state.page {
            sink.log(&format!("Changing page - From {} to {}", self.state.page, parsed.page));
            let inside_category = self.state.in_category();
            self.perform(Action::NextPage { inside_category }, sink)?;
            self.state.page = parsed.page.to_string();
            self.state.location = Location::Top;
        }

        let target = self.target;
        let Some(target_section) = target.section(name) else {
            sink.log(&format!("Could not find section '{}' in target profile.", name));
            self.advance_past_section(sink)?;
            self.state.edit_active = false;
            return Ok(Flow::Continue);
        };

        if !continuing {
            self.perform(Action::EnterSection, sink)?;
            self.state.location = Location::Category;
        }
        self.state.edit_active = false;

        let attributes: Vec<String> = self
            .working
            .section(name)
            .map(|s| s.names().map(str::to_string).collect())
            .unwrap_or_default();
        let policy = self.settings.clamp.policy_for(parsed.page);

        for attribute in &attributes {
            if sink.stop_requested() {
                sink.log(&format!("Stop requested, halting before {}", attribute));
                return Ok(Flow::Stop);
            }
            self.visit_attribute(name, attribute, target_section, policy, sink)?;
        }

        if self.state.in_category() && self.state.edit_active {
            tracing::debug!("Staying inside {} for its secondary section", name);
        } else {
            self.advance_past_section(sink)?;
        }
        Ok(Flow::Continue)
    }

    fn visit_attribute<S: Sink + ?Sized>(
        &mut self,
        section: &str,
        attribute: &str,
        target_section: &Section,
        policy: ClampPolicy,
        sink: &mut S,
    ) -> Result<()> {
        let current = self.working.section(section).and_then(|s| s.get(attribute)).unwrap_or(UNSET);

        let (requested, explicit) = match target_section.get(attribute) {
            Some(value) => (value, true),
            None => {
                sink.log(&format!(
                    "Could not find {} in target profile, using default of {}!",
                    attribute, current
                ));
                (current, false)
            }
        };

        if requested == UNSET {
            sink.log(&format!(
                "Could not find a value for {} in target profile, using default of {}!",
                attribute, current
            ));
            return self.perform(Action::ConfirmOrAdvance, sink);
        }

        let activated = requested == self.settings.activation_value;
        match classify(attribute) {
            // An absent flag row is never a request to flip it.
            AttributeKind::Toggle | AttributeKind::ExclusiveFlag if !explicit => {
                self.slide(section, attribute, current, requested, policy, sink)
            }
            AttributeKind::Toggle if activated => {
                sink.log(&format!("Enabling secondary section for {}", attribute));
                self.state.edit_active = true;
                self.perform(Action::ToggleAndAdvance, sink)
            }
            AttributeKind::ExclusiveFlag if activated => {
                self.perform(Action::ToggleAndAdvance, sink)
            }
            AttributeKind::Toggle | AttributeKind::ExclusiveFlag => {
                self.perform(Action::ConfirmOrAdvance, sink)
            }
            AttributeKind::Preset => {
                sink.log(&format!(
                    "Skipping preset for {} so it doesn't change values!",
                    attribute
                ));
                self.perform(Action::ConfirmOrAdvance, sink)
            }
            AttributeKind::Ordinary => {
                self.slide(section, attribute, current, requested, policy, sink)
            }
        }
    }

    fn slide<S: Sink + ?Sized>(
        &mut self,
        section: &str,
        attribute: &str,
        current: i32,
        requested: i32,
        policy: ClampPolicy,
        sink: &mut S,
    ) -> Result<()> {
        sink.log(&format!("Going from {} to {} for {}", current, requested, attribute));

        let stepped_target = requested.saturating_mul(self.scale_for(attribute));
        self.perform(Action::StepSlider { current, target: stepped_target }, sink)?;
        self.perform(Action::ConfirmOrAdvance, sink)?;

        let Some(working) = self.working.section_mut(section) else {
            return Ok(());
        };
        let propagation =
            propagate(&self.settings.dependencies, attribute, current, requested, working, policy);
        *working = propagation.section;
        working.set(attribute, requested);

        for adjustment in propagation.adjustments {
            match adjustment {
                Adjustment::Updated { name, from, to } => {
                    sink.log(&format!("Updating {} from {} to {}", name, from, to));
                }
                Adjustment::Skipped { name } => {
                    sink.log(&format!("{} not found in section, skipping update.", name));
                }
            }
        }
        Ok(())
    }

    /// Leave the category if inside one, otherwise step to the next category.
    fn advance_past_section<S: Sink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        if self.state.in_category() {
            self.perform(Action::LeaveSection, sink)?;
            self.state.location = Location::Top;
            Ok(())
        } else {
            self.perform(Action::ConfirmOrAdvance, sink)
        }
    }

    fn scale_for(&self, attribute: &str) -> i32 {
        self.settings
            .attribute_scales
            .iter()
            .find(|(fragment, _)| attribute.contains(fragment.as_str()))
            .map(|(_, scale)| *scale)
            .unwrap_or(1)
    }

    fn perform<S: Sink + ?Sized>(&self, action: Action, sink: &mut S) -> Result<()> {
        for event in encode(action, self.settings.timing) {
            sink.emit(event)?;
        }
        Ok(())
    }
}

fn initial_state(baseline: &Profile) -> NavState {
    let page = baseline
        .sections()
        .first()
        .map(|s| SectionName::parse(s.name()).page.to_string())
        .unwrap_or_default();
    NavState::new(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::PrimitiveKind::{self, *};
    use similar_asserts::assert_eq;

    fn profile(sections: Vec<Section>) -> Profile {
        sections.into_iter().fold(Profile::new(), Profile::with_section)
    }

    fn run(baseline: Profile, target: &Profile) -> Plan {
        Planner::new(baseline, target, EngineSettings::default()).plan().expect("plan")
    }

    fn kinds(plan: &Plan) -> Vec<PrimitiveKind> {
        plan.events.iter().map(|e| e.kind).collect()
    }

    fn count(plan: &Plan, kind: PrimitiveKind) -> usize {
        plan.events.iter().filter(|e| e.kind == kind).count()
    }

    #[test]
    fn single_slider_steps_then_advances() {
        let baseline = profile(vec![Section::new("body_body").with("body_height", 10)]);
        let target = profile(vec![Section::new("body_body").with("body_height", 14)]);

        let plan = run(baseline, &target);

        assert_eq!(
            kinds(&plan),
            vec![Toggle, Increase, Increase, Increase, Increase, Confirm, Cancel, Confirm]
        );
        let going: Vec<_> = plan.log.iter().filter(|l| l.starts_with("Going from 10 to 14")).collect();
        assert_eq!(going.len(), 1);
        assert_eq!(plan.outcome, Outcome::Completed);
        assert_eq!(plan.log.last().map(String::as_str), Some(COMPLETE_MESSAGE));
    }

    #[test]
    fn dependent_update_is_clamped_and_folded_back() {
        let baseline = profile(vec![Section::new("body_body")
            .with("arm_size", 5)
            .with("upper_arm_thickness", 100)]);
        let target = profile(vec![Section::new("body_body").with("arm_size", 8)]);

        let mut planner = Planner::new(baseline, &target, EngineSettings::default());
        let mut sink = RecordingSink::new();
        planner.run(&mut sink).expect("run");

        let body = planner.working().section("body_body").expect("section");
        assert_eq!(body.get("upper_arm_thickness"), Some(100));
        assert_eq!(body.get("arm_size"), Some(8));
        assert!(sink.log.iter().any(|l| l == "Updating upper_arm_thickness from 100 to 100"));
        assert!(sink.log.iter().any(|l| l == "forearm_thickness not found in section, skipping update."));
        // the dependent row sees the propagated value as its starting point
        assert!(sink.log.iter().any(|l| l == "Going from 100 to 100 for upper_arm_thickness"));
    }

    #[test]
    fn later_rows_start_from_propagated_value() {
        let baseline = profile(vec![Section::new("body_body")
            .with("leg_size", 0)
            .with("thigh_size", 10)
            .with("calf_size", 0)]);
        let target = profile(vec![Section::new("body_body")
            .with("leg_size", 5)
            .with("thigh_size", 12)
            .with("calf_size", 5)]);

        let plan = run(baseline, &target);

        // leg 0→5, thigh 15→12, calf 5→5
        assert_eq!(count(&plan, Increase), 5);
        assert_eq!(count(&plan, Decrease), 3);
    }

    #[test]
    fn preset_rows_are_never_slid() {
        let baseline = profile(vec![Section::new("face_nose").with("nose_preset", 0)]);
        let target = profile(vec![Section::new("face_nose").with("nose_preset", 7)]);

        let plan = run(baseline, &target);

        assert_eq!(kinds(&plan), vec![Toggle, Confirm, Cancel, Confirm]);
        assert_eq!(plan.log.iter().filter(|l| l.starts_with("Skipping preset")).count(), 1);
    }

    #[test]
    fn missing_attribute_matches_explicit_baseline_value() {
        let baseline = || {
            profile(vec![Section::new("body_body")
                .with("height", 3)
                .with("eye_edit", 0)
                .with("nose_preset", 4)
                .with("weight", 7)])
        };
        let implicit = profile(vec![Section::new("body_body").with("height", 5)]);
        let explicit = profile(vec![Section::new("body_body")
            .with("height", 5)
            .with("eye_edit", 0)
            .with("nose_preset", 4)
            .with("weight", 7)]);

        assert_eq!(run(baseline(), &implicit).events, run(baseline(), &explicit).events);
    }

    #[test]
    fn missing_edit_toggle_is_not_flipped() {
        let baseline = profile(vec![
            Section::new("face_eyes").with("eye_edit", 1).with("eye_size", 0),
            Section::new("face_eyes_2").with("pupil_size", 0),
        ]);
        let target = profile(vec![
            Section::new("face_eyes").with("eye_size", 2),
            Section::new("face_eyes_2").with("pupil_size", 3),
        ]);

        let plan = run(baseline, &target);

        assert_eq!(
            kinds(&plan),
            vec![Toggle, Confirm, Increase, Increase, Confirm, Cancel, Confirm]
        );
        assert!(plan.log.iter().any(|l| l == "Going from 1 to 1 for eye_edit"));
        assert!(!plan.log.iter().any(|l| l.starts_with("Enabling secondary section")));
    }

    #[test]
    fn unset_value_keeps_baseline_and_still_advances() {
        let baseline = profile(vec![Section::new("body_body").with("height", 3)]);
        let target = profile(vec![Section::new("body_body").with("height", UNSET)]);

        let plan = run(baseline, &target);

        assert_eq!(kinds(&plan), vec![Toggle, Confirm, Cancel, Confirm]);
        assert!(plan.log[0].starts_with("Could not find a value for height"));
    }

    fn eyes_baseline() -> Profile {
        profile(vec![
            Section::new("face_eyes").with("eye_edit", 0).with("eye_size", 0),
            Section::new("face_eyes_2").with("pupil_size", 0),
            Section::new("face_nose").with("nose_width", 0),
        ])
    }

    fn eyes_target(edit: i32) -> Profile {
        profile(vec![
            Section::new("face_eyes").with("eye_edit", edit),
            Section::new("face_eyes_2").with("pupil_size", 3),
            Section::new("face_nose").with("nose_width", -2),
        ])
    }

    #[test]
    fn secondary_section_visited_after_edit_toggle() {
        let plan = run(eyes_baseline(), &eyes_target(1));

        assert_eq!(
            kinds(&plan),
            vec![
                Toggle, Toggle, Confirm, Confirm, // face_eyes: enter, edit on, eye_size
                Increase, Increase, Increase, Confirm, Cancel, Confirm, // face_eyes_2
                Toggle, Decrease, Decrease, Confirm, Cancel, Confirm, // face_nose
            ]
        );
        assert!(plan.log.iter().any(|l| l == "Enabling secondary section for eye_edit"));
    }

    #[test]
    fn secondary_section_skipped_without_edit_toggle() {
        let plan = run(eyes_baseline(), &eyes_target(0));

        assert_eq!(
            kinds(&plan),
            vec![
                Toggle, Confirm, Confirm, Cancel, Confirm, // face_eyes
                Toggle, Decrease, Decrease, Confirm, Cancel, Confirm, // face_nose
            ]
        );
        assert_eq!(count(&plan, Increase), 0);
    }

    #[test]
    fn state_tracks_page_and_location_per_section() {
        let baseline = profile(vec![
            Section::new("body_body").with("height", 0),
            Section::new("face_eyes").with("eye_size", 0),
        ]);
        let target = profile(vec![Section::new("face_eyes").with("eye_size", 1)]);

        let mut planner = Planner::new(baseline, &target, EngineSettings::default());
        let mut sink = RecordingSink::new();
        assert_eq!(planner.state(), &NavState::new("body"));

        planner.visit_section("body_body", &mut sink).expect("body");
        assert_eq!(planner.state().location, Location::Top);
        assert_eq!(sink.events.iter().map(|e| e.kind).collect::<Vec<_>>(), vec![Confirm]);
        assert!(sink.log[0].contains("Could not find section 'body_body'"));

        planner.visit_section("face_eyes", &mut sink).expect("face");
        assert_eq!(planner.state().page, "face");
        assert_eq!(planner.state().location, Location::Top);
        assert_eq!(
            sink.events.iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![Confirm, NextPage, Toggle, Increase, Confirm, Cancel, Confirm]
        );
        assert!(sink.log.iter().any(|l| l == "Changing page - From body to face"));
    }

    #[test]
    fn page_change_from_inside_category_cancels_first() {
        let baseline = profile(vec![
            Section::new("body_body").with("body_edit", 0),
            Section::new("face_eyes").with("eye_size", 0),
        ]);
        let target = profile(vec![
            Section::new("body_body").with("body_edit", 1),
            Section::new("face_eyes").with("eye_size", 0),
        ]);

        let plan = run(baseline, &target);

        assert_eq!(
            kinds(&plan),
            vec![Toggle, Toggle, Confirm, Cancel, NextPage, Toggle, Confirm, Cancel, Confirm]
        );
    }

    #[test]
    fn stale_edit_flag_on_same_page_leaves_category() {
        let baseline = profile(vec![
            Section::new("body_body").with("body_edit", 0),
            Section::new("body_arms").with("arm_len", 0),
        ]);
        let target = profile(vec![
            Section::new("body_body").with("body_edit", 1),
            Section::new("body_arms").with("arm_len", 1),
        ]);

        let mut planner = Planner::new(baseline, &target, EngineSettings::default());
        let mut sink = RecordingSink::new();
        planner.visit_section("body_body", &mut sink).expect("body");
        assert!(planner.state().edit_active);
        assert_eq!(planner.state().location, Location::Category);

        planner.visit_section("body_arms", &mut sink).expect("arms");
        assert!(!planner.state().edit_active);
        assert_eq!(planner.state().location, Location::Top);
        assert_eq!(
            sink.events.iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![Toggle, Toggle, Confirm, Cancel, Confirm, Toggle, Increase, Confirm, Cancel, Confirm]
        );
        assert!(!sink.log.iter().any(|l| l.starts_with("Changing page")));
    }

    #[test]
    fn exclusive_flag_toggles_without_unlocking() {
        let baseline = profile(vec![
            Section::new("face_eyes").with("eyes_closed", 0),
            Section::new("face_eyes_2").with("pupil_size", 0),
        ]);
        let target = profile(vec![
            Section::new("face_eyes").with("eyes_closed", 1),
            Section::new("face_eyes_2").with("pupil_size", 4),
        ]);

        let plan = run(baseline, &target);

        assert_eq!(kinds(&plan), vec![Toggle, Toggle, Confirm, Cancel, Confirm]);
    }

    #[test]
    fn chest_shape_target_is_doubled_for_stepping() {
        let baseline = profile(vec![Section::new("body_chest").with("chest_shape", 0)]);
        let target = profile(vec![Section::new("body_chest").with("chest_shape", 3)]);

        let plan = run(baseline, &target);

        assert_eq!(count(&plan, Increase), 6);
        assert!(plan.log.iter().any(|l| l == "Going from 0 to 3 for chest_shape"));
    }

    #[test]
    fn markings_page_uses_wide_clamp() {
        let baseline = profile(vec![Section::new("markings_tattoo")
            .with("body_tattoo_overall_scale", 100)
            .with("body_tattoo_vert_scale", 350)
            .with("body_tattoo_horz_scale", 50)]);
        let target = profile(vec![Section::new("markings_tattoo").with("body_tattoo_overall_scale", 200)]);

        let mut planner = Planner::new(baseline, &target, EngineSettings::default());
        planner.run(&mut RecordingSink::new()).expect("run");

        let section = planner.working().section("markings_tattoo").expect("section");
        assert_eq!(section.get("body_tattoo_vert_scale"), Some(400));
        assert_eq!(section.get("body_tattoo_horz_scale"), Some(150));
    }

    #[test]
    fn stop_is_honoured_between_decisions() {
        let baseline = profile(vec![Section::new("body_body").with("height", 0).with("weight", 0)]);
        let target = profile(vec![Section::new("body_body").with("height", 5).with("weight", 5)]);

        let mut planner = Planner::new(baseline, &target, EngineSettings::default());
        let mut sink = RecordingSink::stop_after(2);
        let outcome = planner.run(&mut sink).expect("run");

        assert_eq!(outcome, Outcome::Stopped);
        assert!(!sink.completed);
        // the first slider run is never cut short
        assert_eq!(sink.events.iter().map(|e| e.kind).collect::<Vec<_>>(), vec![
            Toggle, Increase, Increase, Increase, Increase, Increase, Confirm
        ]);
    }

    #[test]
    fn run_restarts_from_pristine_baseline() {
        let baseline = profile(vec![Section::new("body_body").with("height", 0)]);
        let target = profile(vec![Section::new("body_body").with("height", 2)]);

        let mut planner = Planner::new(baseline, &target, EngineSettings::default());
        let mut first = RecordingSink::new();
        let mut second = RecordingSink::new();
        planner.run(&mut first).expect("first");
        planner.run(&mut second).expect("second");

        assert_eq!(first.events, second.events);
        assert!(second.completed);
    }
}
