use std::fmt;

/// One discrete phase of the simulated disease narrative.
///
/// The wire form (used in serde and in provider prompts) is
/// SCREAMING_SNAKE_CASE, matching the stage names shown in the UI overlay.
///
/// # State Machine
/// ```text
///                select(1|2|3)
/// ┌────────┐ <───────────────────> ┌──────────┐ <──> ┌────────────────┐
/// │ Normal │                       │ Varicose │      │ ThrombusFormed │
/// └────────┘                       └──────────┘      └───────┬────────┘
///      ^                                                     │ detach()
///      │ select(1|2|3), from any settled stage               v
/// ┌────┴─────────┐      6.5 s one-shot timer         ┌───────────┐
/// │ PostEmbolism │ <──────────────────────────────── │ Detaching │
/// └──────────────┘                                   └───────────┘
/// ```
///
/// While `Detaching`, all user-invoked transitions are rejected; the only
/// way out is the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Healthy flow: competent valves pumping blood back against gravity.
    Normal,
    /// Valve failure: dilated vessel, reflux, venous hypertension.
    Varicose,
    /// Stasis-driven clot attached to the vessel wall.
    ThrombusFormed,
    /// The clot has broken free and is travelling with the flow.
    Detaching,
    /// The embolus has reached the lungs; pulmonary embolism.
    PostEmbolism,
}

impl Stage {
    /// All stages, in narrative order.
    #[must_use]
    pub const fn all() -> [Stage; 5] {
        [
            Stage::Normal,
            Stage::Varicose,
            Stage::ThrombusFormed,
            Stage::Detaching,
            Stage::PostEmbolism,
        ]
    }

    /// Canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::Normal => "NORMAL",
            Stage::Varicose => "VARICOSE",
            Stage::ThrombusFormed => "THROMBUS_FORMED",
            Stage::Detaching => "DETACHING",
            Stage::PostEmbolism => "POST_EMBOLISM",
        }
    }

    /// Human-readable name for panels and status lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Stage::Normal => "Healthy physiology",
            Stage::Varicose => "Varicose veins",
            Stage::ThrombusFormed => "Deep vein thrombosis",
            Stage::Detaching => "Thrombus detaching",
            Stage::PostEmbolism => "Pulmonary embolism",
        }
    }

    /// Stages the user may jump to directly. `Detaching` is reachable only
    /// via the detach action, `PostEmbolism` only via the timer.
    #[must_use]
    pub const fn user_selectable(self) -> bool {
        matches!(
            self,
            Stage::Normal | Stage::Varicose | Stage::ThrombusFormed
        )
    }

    /// Whether the diseased (wavy, dilated) vessel geometry applies.
    #[must_use]
    pub const fn is_diseased(self) -> bool {
        !matches!(self, Stage::Normal)
    }

    /// Whether a clot is present inside the vessel (parked or travelling).
    #[must_use]
    pub const fn has_clot(self) -> bool {
        matches!(self, Stage::ThrombusFormed | Stage::Detaching)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
