//! Fixed reply templates
//!
//! Every spoken string the orchestrator produces comes from here. There is
//! deliberately no free-form generation; the templates are the whole
//! vocabulary.

pub fn route_summary(destination: &str, steps: u32, crosses_floors: bool) -> String {
    if crosses_floors {
        format!(
            "Heading to {}. It is about {} steps away, including a floor change by stairs or elevator.",
            destination, steps
        )
    } else {
        format!("Heading to {}. It is about {} steps away.", destination, steps)
    }
}

pub fn arrival(destination: &str) -> String {
    format!("You have arrived at {}.", destination)
}

pub fn location_set(name: &str) -> String {
    format!("Got it, you are at {}.", name)
}

pub fn replanned(destination: &str, steps: u32) -> String {
    format!(
        "Recalculated from your new position. {} is about {} steps away.",
        destination, steps
    )
}

pub fn remaining(steps: u32) -> String {
    match steps {
        0 => "You are there.".to_string(),
        1 => "About 1 step left.".to_string(),
        n => format!("About {} steps left.", n),
    }
}

pub fn unreachable(destination: &str) -> String {
    format!(
        "I could not find a route to {}. The destination may not be connected to where you are.",
        destination
    )
}

pub fn unknown_place(name: &str) -> String {
    format!("I know the name {} but it is not on the map I have.", name)
}

pub fn nearest_none(kind: &str) -> String {
    format!("There is no {} on this floor.", kind)
}

pub fn ask_destination() -> String {
    "There is no active route yet. Where would you like to go?".to_string()
}

pub fn no_current_location() -> String {
    "I don't know where you are yet. Tell me, for example \"I am at the main entrance\"."
        .to_string()
}

pub fn located_at(name: &str, floor: i32) -> String {
    format!("You are at {} on floor {}.", name, floor)
}
