//! The trip planning pipeline.
//!
//! A [`TripPlan`] follows the stages of planning a trip, from collecting
//! preferences to writing the itinerary. The model does the actual work;
//! the plan watches finished turns to tell which stages are done, and
//! tells the model (through the system prompt) and the user (through the
//! progress line) what is left.

use std::fmt::{self, Display};

use travel_agent_core::Turn;

use crate::tools::{SEARCH_FLIGHTS, SEARCH_HOTELS};

/// A stage of the trip planning pipeline, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Ask the user for origin, destination and dates.
    CollectPreferences,
    /// Search flights matching the preferences.
    FetchFlights,
    /// Search hotels matching the preferences.
    FetchHotels,
    /// Suggest activities and attractions at the destination.
    FetchActivities,
    /// Put everything together into an itinerary.
    SynthesizeItinerary,
    /// Nothing left to do.
    Complete,
}

impl Stage {
    /// All stages that have work to do, in order.
    pub const PENDING: [Stage; 5] = [
        Stage::CollectPreferences,
        Stage::FetchFlights,
        Stage::FetchHotels,
        Stage::FetchActivities,
        Stage::SynthesizeItinerary,
    ];

    /// Returns a short label for progress displays.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::CollectPreferences => "preferences",
            Stage::FetchFlights => "flights",
            Stage::FetchHotels => "hotels",
            Stage::FetchActivities => "activities",
            Stage::SynthesizeItinerary => "itinerary",
            Stage::Complete => "complete",
        }
    }

    /// Returns the instructions given to the model for this stage.
    pub fn instructions(&self) -> &'static [&'static str] {
        match self {
            Stage::CollectPreferences => &[
                "Start by asking the user for their travel preferences and details such as origin, destination, departure date, return date, check-in and check-out dates.",
            ],
            Stage::FetchFlights => &[
                "Use the `search_flights` tool to find flights matching the user's criteria.",
            ],
            Stage::FetchHotels => &[
                "Use the `search_hotels` tool to find hotels matching the user's criteria.",
                "Summarize the top two flight and hotel options, including dates and prices.",
            ],
            Stage::FetchActivities => &[
                "Suggest popular activities and attractions in the user's destination.",
            ],
            Stage::SynthesizeItinerary => &[
                "Create a suggested itinerary including flights, hotels, and activities, with estimated costs and trip duration.",
                "Return the total estimated cost of the trip and the duration of the trip.",
            ],
            Stage::Complete => &[],
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The progress of planning one trip.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TripPlan {
    preferences: bool,
    flights: bool,
    hotels: bool,
    activities: bool,
    itinerary: bool,
}

impl TripPlan {
    /// Creates a plan with nothing done.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `stage` has been completed.
    pub fn is_done(&self, stage: Stage) -> bool {
        match stage {
            Stage::CollectPreferences => self.preferences,
            Stage::FetchFlights => self.flights,
            Stage::FetchHotels => self.hotels,
            Stage::FetchActivities => self.activities,
            Stage::SynthesizeItinerary => self.itinerary,
            Stage::Complete => {
                Stage::PENDING.iter().all(|stage| self.is_done(*stage))
            }
        }
    }

    /// Returns the first stage that is not done yet.
    pub fn current_stage(&self) -> Stage {
        Stage::PENDING
            .into_iter()
            .find(|stage| !self.is_done(*stage))
            .unwrap_or(Stage::Complete)
    }

    /// Marks a stage as done.
    ///
    /// Searching implies the preferences are known, and the itinerary
    /// includes the activities, so those are completed along the way.
    pub fn complete(&mut self, stage: Stage) {
        match stage {
            Stage::CollectPreferences => self.preferences = true,
            Stage::FetchFlights => {
                self.preferences = true;
                self.flights = true;
            }
            Stage::FetchHotels => {
                self.preferences = true;
                self.hotels = true;
            }
            Stage::FetchActivities => self.activities = true,
            Stage::SynthesizeItinerary => {
                self.activities = true;
                self.itinerary = true;
            }
            Stage::Complete => {
                *self = Self {
                    preferences: true,
                    flights: true,
                    hotels: true,
                    activities: true,
                    itinerary: true,
                }
            }
        }
    }

    /// Advances the plan with a finished turn.
    ///
    /// Successful searches complete their stages. A reply given once both
    /// searches are done carries the activities and the itinerary.
    pub fn record_turn(&mut self, turn: &Turn) {
        for call in turn.tool_calls.iter().filter(|call| call.result.is_ok()) {
            match call.name.as_str() {
                SEARCH_FLIGHTS => self.complete(Stage::FetchFlights),
                SEARCH_HOTELS => self.complete(Stage::FetchHotels),
                _ => {}
            }
        }

        if self.flights && self.hotels && !turn.reply.trim().is_empty() {
            self.complete(Stage::SynthesizeItinerary);
        }
        debug!("plan advanced to: {}", self.current_stage());
    }

    /// Renders the numbered instructions for the system prompt.
    pub fn instructions() -> String {
        Stage::PENDING
            .iter()
            .flat_map(|stage| stage.instructions())
            .enumerate()
            .map(|(idx, line)| format!("{}. {line}\n", idx + 1))
            .collect()
    }

    /// Renders the progress as a single line, such as
    /// `✓ preferences · ✓ flights · ○ hotels · ○ activities · ○ itinerary`.
    pub fn checklist(&self) -> String {
        Stage::PENDING
            .iter()
            .map(|stage| {
                let mark = if self.is_done(*stage) { "✓" } else { "○" };
                format!("{mark} {}", stage.label())
            })
            .collect::<Vec<_>>()
            .join(" · ")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use travel_agent_core::ToolCallRecord;
    use travel_agent_core::tool::Error as ToolError;

    use super::*;

    fn turn(reply: &str, calls: &[(&str, bool)]) -> Turn {
        Turn {
            reply: reply.to_owned(),
            tool_calls: calls
                .iter()
                .enumerate()
                .map(|(idx, (name, ok))| ToolCallRecord {
                    id: format!("call_{idx}"),
                    name: (*name).to_owned(),
                    arguments: json!({}),
                    result: if *ok {
                        Ok("[]".to_owned())
                    } else {
                        Err(ToolError::execution_error().with_reason("boom"))
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn test_stages_advance() {
        let mut plan = TripPlan::new();
        assert_eq!(plan.current_stage(), Stage::CollectPreferences);

        plan.record_turn(&turn("Where would you like to go?", &[]));
        assert_eq!(plan.current_stage(), Stage::CollectPreferences);

        let flights = [(SEARCH_FLIGHTS, true)];
        plan.record_turn(&turn("Here are some flights.", &flights));
        assert_eq!(plan.current_stage(), Stage::FetchHotels);
        assert!(plan.is_done(Stage::CollectPreferences));

        plan.record_turn(&turn("", &[(SEARCH_HOTELS, false)]));
        assert_eq!(plan.current_stage(), Stage::FetchHotels);

        let hotels = [(SEARCH_HOTELS, true)];
        plan.record_turn(&turn("Here is your itinerary.", &hotels));
        assert_eq!(plan.current_stage(), Stage::Complete);
        assert!(plan.is_done(Stage::Complete));
    }

    #[test]
    fn test_hotels_first() {
        let mut plan = TripPlan::new();
        plan.record_turn(&turn("", &[(SEARCH_HOTELS, true)]));
        assert_eq!(plan.current_stage(), Stage::FetchFlights);
        assert!(plan.is_done(Stage::FetchHotels));
    }

    #[test]
    fn test_instructions() {
        let instructions = TripPlan::instructions();
        let lines: Vec<_> = instructions.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("1. Start by asking"));
        assert!(lines[1].contains("`search_flights`"));
        assert!(lines[6].starts_with("7. Return the total estimated cost"));
    }

    #[test]
    fn test_checklist() {
        let mut plan = TripPlan::new();
        plan.complete(Stage::FetchFlights);
        assert_eq!(
            plan.checklist(),
            "✓ preferences · ✓ flights · ○ hotels · ○ activities · ○ itinerary"
        );
    }
}
