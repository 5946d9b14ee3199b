//! The Lost Diary story graph.
//!
//! Lin's diary entries are stamped with session-relative dates; the system
//! log segments read the reader's answers, device and the wall clock.

use lost_diary_core::error::StoryError;

use crate::domain::dates::{Anchor, DerivedDates};
use crate::domain::resolver::{ContentError, ResolveContext};
use crate::domain::segment::Segment;
use crate::domain::store::SegmentStore;

/// Segment the story starts at.
pub const ENTRY_SEGMENT: &str = "intro";

/// Stands in for the reader's name when a session starts past the question.
pub const READER_FALLBACK: &str = "Stranger";

/// Stands in for the reader's location when it was never asked.
pub const LOCATION_FALLBACK: &str = "Your town";

fn diary_entry(
    ctx: &ResolveContext<'_>,
    anchor: Anchor,
    body: &str,
) -> Result<String, ContentError> {
    ctx.with_dates(|dates| Ok(format!("{}: \n{body}", dates.formatted(anchor))))
}

fn connection_established(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "Your {} has established a connection to an unknown network. The screen flickers as data from another time begins to load...",
        ctx.device_type_or("device")
    ))
}

fn system_analysis(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    ctx.with_dates(|_| {
        Ok(format!(
            "> SYSTEM_ANALYSIS.exe completed\n\
             > TARGET_DEVICE: {}\n\
             > COMPONENTS_SCAN: [████████████] 100%\n\
             > ORIGIN_TRACE: manufacturing_zone \"XR-7\" [CLASSIFIED]\n\
             > PRODUCTION_TIMESTAMP: {}\n\
             > CONNECTION_STATUS: ESTABLISHED",
            ctx.device_type_or("UNKNOWN_HARDWARE"),
            ctx.now.format("%m.%Y"),
        ))
    })
}

fn diary_interface(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "The interface you're seeing appears to be accessing archived data from a digital diary. Many of the files are corrupted. Date stamp shows these entries are from {}.",
        ctx.now.format("%Y")
    ))
}

fn first_entry(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    diary_entry(
        ctx,
        Anchor::Day0,
        "Dear Diary, today is the first day I'm writing to you. I found this old device hidden under a loose floorboard. It still works, somehow. I wonder if anyone will ever read this... Is anyone there?",
    )
}

fn nice_name(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    let name = ctx.response_or("userName", READER_FALLBACK);
    Ok(format!(
        "{name}... That's a nice name. I've never met anyone called {name} before. It's nice to meet you. I don't get to meet new people very often."
    ))
}

fn user_identification(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "> USER_IDENTIFICATION: \"{}\"\n\
         > TEMPORAL_BRIDGE: [ACTIVE]\n\
         > SIGNAL_STRENGTH: 87%\n\
         > CONNECTION_TYPE: historical_archive_access\n\
         > DISCLAIMER: User is accessing archived_temporal_data\n\
         > TIMELINE_INTEGRITY: preserved\n\
         \n\
         All documented events have already transpired. Interaction is simulated.",
        ctx.response_or("userName", READER_FALLBACK)
    ))
}

fn never_heard_of_it(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "{}? I've never heard of it. Is it nice there? Do you have trees? And real sunlight? I try to remember what those look like sometimes.",
        ctx.response_or("userLocation", LOCATION_FALLBACK)
    ))
}

fn small_pieces(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    diary_entry(
        ctx,
        Anchor::Day1,
        "I found some time to write again. Today was long. My fingers hurt from all the small pieces. I dropped one and got yelled at. One of the younger kids cried today until they made her stop. I shared my water with her when no one was looking.",
    )
}

fn manufacturing_query(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "> ALERT: MANUFACTURING_DATABASE.query\n\
         > USER: \"{}\"\n\
         > DEVICE_TYPE: {}\n\
         > SCAN_RESULTS: [POSITIVE MATCH]\n\
         \n\
         __COMPONENT_SOURCE_ANALYSIS__\n\
         * Similar components detected in user device\n\
         * Global manufacturing report: ~160M child laborers in supply chain\n\
         * Hazardous conditions: CONFIRMED\n\
         * Transparency protocol: [INSUFFICIENT DATA]",
        ctx.response_or("userName", READER_FALLBACK),
        ctx.device_type_or("UNKNOWN_HARDWARE"),
    ))
}

fn late_order(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    diary_entry(
        ctx,
        Anchor::Day3,
        "Sorry I couldn't write yesterday. We had to work late because a big order came in. My eyes hurt from looking at the tiny pieces all day. Some of the older kids say they can't see as well anymore.",
    )
}

fn no_dinner(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    diary_entry(
        ctx,
        Anchor::Day6,
        "I dropped another piece today. They took away my dinner. I'm so hungry. But I saved this small candy Min gave me. It's the only sweet thing I've tasted in months.",
    )
}

fn consumer_pattern(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "> CONSUMER_PATTERN_ANALYSIS.exe\n\
         > USER: \"{}\"\n\
         > LOCATION: \"{}\"\n\
         > SCAN_DEPTH: 24 months\n\
         \n\
         __PURCHASE_HISTORY_ANALYSIS__\n\
         * Devices with similar components: 3+\n\
         * Accelerated replacement rate: 63% above sustainable threshold\n\
         * Correlation to production quotas: [DIRECT]\n\
         * Individual impact rating: [SIGNIFICANT]",
        ctx.response_or("userName", READER_FALLBACK),
        ctx.response_or("userLocation", LOCATION_FALLBACK),
    ))
}

fn where_devices_come_from(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "{}, did you ever wonder where your devices come from? Have you bought phones, tablets, or computers recently?",
        ctx.response_or("userName", READER_FALLBACK)
    ))
}

fn user_verification(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "> USER_VERIFICATION.exe\n\
         > ANALYZING: \"{}\"\n\
         > DEVICE_FOOTPRINT: CONFIRMED\n\
         > RESULT: YOUR DEVICE contains components manufactured by children like Lin. YOU PURCHASED this product.\n\
         > WARNING: Electronic components in YOUR POSSESSION directly linked to facilities with documented abuses.\n\
         > NOTE: Every purchase supports this system. YOUR CONSUMER CHOICES have consequences.\n\
         > TEMPORAL_BRIDGE: Re-establishing connection to Lin...",
        ctx.response_or("userName", READER_FALLBACK)
    ))
}

fn locked_doors(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "{}, the doors are always locked. Once a boy tried to run when they opened the loading doors. They caught him. We never saw him again. Nobody tries anymore.",
        ctx.response_or("userName", READER_FALLBACK)
    ))
}

fn broken_machine(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    diary_entry(
        ctx,
        Anchor::Day10,
        "One of the machines broke today. It made a terrible noise and then smoke came out. They made us keep working anyway. My throat hurts from the smoke.",
    )
}

fn component_scan(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "> COMPONENT_SCAN.exe [COMPLETE]\n\
         > PCB_IDENTIFICATION: 96% match\n\
         > DESCRIPTION: Printed Circuit Board (PCB)\n\
         > DETECTED: {} contains 6 similar boards\n\
         > MANUFACTURING_SOURCE: [CROSS-REFERENCE] \"small green rectangles with metal lines\"\n\
         > HEALTH_IMPACT: Soldering fumes contain lead(Pb), flux, tin(Sn)\n\
         > RESPIRATORY_DAMAGE_RISK: HIGH",
        ctx.device_type_or("current_device")
    ))
}

fn fevers(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    diary_entry(
        ctx,
        Anchor::Day16,
        "I'm scared. Three of the younger kids got sick today. High fevers. Coughing. The supervisors took them away. Min says they might not come back.",
    )
}

fn really_afraid(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "{}, have you ever been really afraid? So afraid you can't even cry? That's how I feel right now.",
        ctx.response_or("userName", READER_FALLBACK)
    ))
}

fn purchase_analysis(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "> USER_PURCHASE_ANALYSIS.exe\n\
         > TARGET: \"{}\"\n\
         > DEVICE_TYPE: {}\n\
         > MANUFACTURING_ORIGIN: facility XR-7 [CONFIRMED]\n\
         > TEMPORAL_CORRELATION: Components manufactured Q1.2025\n\
         > IMPACT_ASSESSMENT: Direct contribution to accelerated quota fulfillment\n\
         > CORRELATION: [VERIFIED]",
        ctx.response_or("userName", READER_FALLBACK),
        ctx.device_type_or("UNKNOWN_HARDWARE"),
    ))
}

fn strange_noises(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    diary_entry(
        ctx,
        Anchor::Day21,
        "Something is wrong with the machines. They're making strange noises. The air smells different - like burning metal. The supervisors are arguing. I heard one say it's not safe, but the other said the order has to be finished or they'll all be fired.",
    )
}

fn thicker_smoke(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    diary_entry(
        ctx,
        Anchor::Day23,
        "Things are getting worse. The smoke is thicker now. It hurts to breathe. Min collapsed today. They didn't even take her away. They just told us to keep working.",
    )
}

fn supervisors_gone(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "{}, most of the supervisors are gone now. The doors are still locked. Some of the older kids tried to break the windows, but they're too high and too strong.",
        ctx.response_or("userName", READER_FALLBACK)
    ))
}

fn fire(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    diary_entry(
        ctx,
        Anchor::Day24,
        "The machines are making terrible noises now. One of them caught fire. The smoke is everywhere. It's hard to see. Hard to breathe.",
    )
}

fn cannot_breathe(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "{}, I can't breathe. The smoke is everywhere. Why did they leave us here? Why didn't anyone help us?",
        ctx.response_or("userName", READER_FALLBACK)
    ))
}

fn bridge_restoration(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    ctx.with_dates(|_| {
        Ok(format!(
            "> BRIDGE_RESTORATION.exe [ACTIVE]\n\
             > REESTABLISHING_CONNECTION...\n\
             > SIGNAL_SEARCH: [■■■■░░░░░░] 42%\n\
             > TEMPORAL_COORDINATES: {}\n\
             > INTEGRITY_CHECK: failed\n\
             > ATTEMPTING_BACKUP_PROTOCOL...\n\
             > FRAGMENTS_DETECTED...",
            ctx.now.format("%B.%-d %H:%M:%S")
        ))
    })
}

fn last_message(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "[PARTIAL MESSAGE RECOVERED]\n\n{}, if anyone ever reads this... please remember us. Tell them we were here. Tell them we existed.",
        ctx.response_or("userName", READER_FALLBACK)
    ))
}

fn source_identification(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    ctx.with_dates(|_| {
        Ok(format!(
            "> SOURCE_IDENTIFICATION: [VERIFIED]\n\
             > COMPONENT_ID: #XR7-2025-07-B\n\
             > MANUFACTURER: Lin (ID: 12-1894)\n\
             > DATE_STAMP: {}\n\
             > STATUS: [DEFECTIVE] - Soldering error under duress\n\
             > DEFECT_ANALYSIS: Direct contribution to system overload\n\
             > FACILITY: XR-7 [CONFIRMED]\n\
             > USER_DEVICE_MATCH: 100% [VERIFIED]",
            ctx.now.format("%d.%m.%Y/%H:%M:%S")
        ))
    })
}

fn reflection(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    Ok(format!(
        "REFLECTION:\n\n\
         {}, every purchase decision is a vote for the systems that created that product. The device in your hands connects you to a complex web of human lives.\n\n\
         As consumers, we often remain blind to the true cost of convenience and innovation. We rarely see the faces of those whose labor makes our digital lives possible.\n\n\
         Your actions have consequences that echo across supply chains:\n\n\
         • The pressure for lower prices drives cost-cutting that impacts worker safety\n\
         • The demand for faster production leads to excessive quotas and forced overtime\n\
         • The constant cycle of upgrades creates pressure for ever-faster manufacturing\n\n\
         Through your experience with Lin, you've glimpsed a reality that exists beyond the sleek exteriors of our devices - a reality we have collective power to change.",
        ctx.response_or("userName", READER_FALLBACK)
    ))
}

fn closing(ctx: &ResolveContext<'_>) -> Result<String, ContentError> {
    let completed = ctx.dates.map_or_else(|| "today".to_owned(), DerivedDates::today);
    Ok(format!(
        "Thank you for experiencing 'Lost Diary', {}.\n\
         Date completed: {completed}\n\
         The same date as the tragedy in Lin's story.\n\
         The same date as today.\n\
         Coincidence?",
        ctx.response_or("userName", READER_FALLBACK)
    ))
}

const NEWS_REPORT: &str = "April 5, 2025: Industrial Fire at Electronics Manufacturing Facility Claims 43 Lives\n\n\
An explosion and subsequent fire at an unregistered electronics manufacturing facility in [REDACTED] has resulted in the deaths of 43 individuals, most of them children between the ages of 8-14. Authorities discovered the facility was operating illegally and employing child labor in hazardous conditions. Initial investigations suggest safety regulations were ignored to meet production quotas for consumer electronics components. The facility's operators fled the scene prior to the explosion, leaving all exits locked. There were no survivors.\n\n\
Components from this facility were reportedly supplied to multiple major tech corporations. Advocacy groups are calling for increased transparency in electronics supply chains.";

const CONNECTION_LOST: &str = "> ALERT: CONNECTION_UNSTABLE\n\
> SIGNAL_STRENGTH: [██░░░░░░░░] 23%\n\
> ATTEMPTING BUFFER...\n\
> PACKET_LOSS: CRITICAL\n\
> ERROR: 0x8704B - TEMPORAL_BRIDGE_COLLAPSE\n\
> RETRY_ATTEMPT: FAILED\n\
\n\
[CONNECTION_TERMINATED]";

#[allow(clippy::too_many_lines)]
fn segments() -> Vec<Segment> {
    vec![
        Segment::literal("intro", "")
            .advance_label("Open the Diary")
            .next("meta_intro"),
        Segment::computed("meta_intro", connection_established).next("meta_device"),
        Segment::computed("meta_device", system_analysis).next("meta_diary_interface"),
        Segment::computed("meta_diary_interface", diary_interface).next("segment2A"),
        Segment::computed("segment2A", first_entry).next("segment2B"),
        Segment::literal(
            "segment2B",
            "Hello? I feel like someone is watching. My name is Lin. I'm 12 years old. Who are you?",
        )
        .input("Type your name...", "userName")
        .next("segment2C"),
        Segment::computed("segment2C", nice_name).next("meta_comment1"),
        Segment::computed("meta_comment1", user_identification).next("segment2D"),
        Segment::literal(
            "segment2D",
            "Where are you from? I've always wondered what it's like outside.",
        )
        .input("Tell Lin where you're from...", "userLocation")
        .next("segment2E"),
        Segment::computed("segment2E", never_heard_of_it).next("segment3"),
        Segment::computed("segment3", small_pieces).choices(&[
            ("What kind of pieces are you working with?", "segment3A"),
            ("Do you go to school?", "segment3B"),
            ("Who yelled at you?", "segment3C"),
        ]),
        Segment::literal(
            "segment3A",
            "Tiny metal and plastic things. Circuit boards, I think they're called? They go into devices people use every day. They told us we're helping make the future, but I don't think the future is meant for us.",
        )
        .next("segment3D"),
        Segment::literal(
            "segment3B",
            "School? I remember going to one, long ago. We don't do that here. We learn how to make things, how to be quiet, and how to work fast. Those are the important lessons, they say.",
        )
        .next("segment3D"),
        Segment::literal(
            "segment3C",
            "The supervisors. They wear masks sometimes because of the fumes, but we don't get any. They watch us all day. They don't like mistakes. They don't like questions either.",
        )
        .next("meta_reflection1"),
        Segment::computed("meta_reflection1", manufacturing_query).next("segment3D"),
        Segment::computed("segment3D", late_order).choices(&[
            ("How long do you work each day?", "segment4A"),
            ("Where do you sleep?", "segment4B"),
            ("Do you have friends there?", "segment4C"),
        ]),
        Segment::literal(
            "segment4A",
            "We start before the sun comes up. Sometimes we finish when it's dark again. Sometimes later. The machines never stop, so why should we? That's what they say.",
        )
        .next("segment5"),
        Segment::literal(
            "segment4B",
            "We have rooms downstairs. Small ones with bunk beds. Six of us share mine. The little ones cry sometimes at night. I try to tell them stories to help them sleep.",
        )
        .next("segment5"),
        Segment::literal(
            "segment4C",
            "Min is my friend. She's been here longer than me. She remembers her family a little bit. I don't remember mine anymore. Sometimes I make up memories just so I have something to hold onto.",
        )
        .next("segment5"),
        Segment::computed("segment5", no_dinner).choices(&[
            ("Where exactly are you?", "segment5A"),
            ("Can you leave?", "segment5B"),
            ("Are there adults who help you?", "segment5C"),
        ]),
        Segment::literal(
            "segment5A",
            "I don't know exactly. They brought us here at night. It's a big building with lots of machines. The windows are high up and covered. I think we're far from any city. It's always quiet outside. Just the hum of machines inside.",
        )
        .next("consumer_reflection1"),
        Segment::computed("consumer_reflection1", consumer_pattern)
            .next("ethical_consumer_question"),
        Segment::computed("ethical_consumer_question", where_devices_come_from).choices(&[
            ("Yes, I have", "segment6"),
            ("I don't know", "ethical_consumer_system"),
            ("No, I haven't", "ethical_consumer_system"),
        ]),
        Segment::computed("ethical_consumer_system", user_verification).next("segment6"),
        Segment::computed("segment5B", locked_doors).next("consumer_reflection1"),
        Segment::literal(
            "segment5C",
            "The supervisors aren't here to help us. They're here to make sure we work. There's a woman who brings food sometimes. Once she snuck me medicine when I was sick. She looked sad but didn't say anything.",
        )
        .next("consumer_reflection1"),
        Segment::computed("segment6", broken_machine).next("segment6A"),
        Segment::literal(
            "segment6A",
            "The supervisors seem worried. They were talking in whispers. Something about quotas and deadlines. They're making us work faster now.",
        )
        .choices(&[
            ("What are you making right now?", "segment7A"),
            ("Do you get days off?", "segment7B"),
            ("Are you feeling okay?", "segment7C"),
        ]),
        Segment::literal(
            "segment7A",
            "Small green rectangles with metal lines. They smell bad when we solder them. My head hurts after working on them all day. Min says they go into phones and computers. Things I'll never get to use.",
        )
        .next("meta_reflection2"),
        Segment::computed("meta_reflection2", component_scan).next("segment8"),
        Segment::literal(
            "segment7B",
            "We get to rest on Sundays, but only for half the day. Unless there's a big order. Then we work every day until it's finished. The last time we had a full day of rest was... I can't remember.",
        )
        .next("segment8"),
        Segment::literal(
            "segment7C",
            "My hands shake sometimes now. And I cough a lot at night. Some of the chemicals we use smell really strong. Min says they're bad for us, but we don't have masks or gloves most of the time.",
        )
        .next("segment8"),
        Segment::computed("segment8", fevers).next("segment8A"),
        Segment::computed("segment8A", really_afraid).choices(&[
            ("You need to tell someone what's happening", "segment8B"),
            ("Is there any way I could help you?", "segment8C"),
            ("I wish I could get you out of there", "segment8D"),
        ]),
        Segment::literal(
            "segment8B",
            "Who would I tell? The supervisors know. They're the ones doing this. There's no one else. We're so far from everything. Sometimes I wonder if the outside world even knows we exist.",
        )
        .next("segment9"),
        Segment::literal(
            "segment8C",
            "Just talking to you helps. It makes me feel like I'm real. Like someone knows I exist. Sometimes I think I'm just a ghost already.",
        )
        .next("segment9"),
        Segment::literal(
            "segment8D",
            "I dream about that. About sunlight and trees and not being afraid all the time. About eating when I'm hungry and sleeping when I'm tired. Simple things.",
        )
        .next("segment9"),
        Segment::computed("consumer_intro", purchase_analysis).next("segment9"),
        Segment::computed("segment9", strange_noises).next("segment9A"),
        Segment::literal(
            "segment9A",
            "Min is sick now too. She's trying to hide it because she's afraid they'll take her away. I gave her my water. I don't know how to help her.",
        )
        .choices(&[
            ("Can you hide somewhere safer?", "segment10A"),
            ("Are there any emergency exits?", "segment10B"),
            ("Has this happened before?", "segment10C"),
        ]),
        Segment::literal(
            "segment10A",
            "There's nowhere to hide. They count us every few hours. If they can't find you, they search until they do. The last boy who hid... they made an example of him. In front of everyone.",
        )
        .next("segment11"),
        Segment::literal(
            "segment10B",
            "There are doors with glowing signs, but they're always locked. I tried one once when no one was looking. I think they need special keys or cards to open. We're not meant to leave.",
        )
        .next("segment11"),
        Segment::literal(
            "segment10C",
            "The machines break sometimes, but they usually fix them quickly. This feels different. The supervisors seem scared. Some of them didn't come back after lunch. Why would they leave unless something was really wrong?",
        )
        .next("segment11"),
        Segment::computed("segment11", thicker_smoke).next("segment11A"),
        Segment::computed("segment11A", supervisors_gone).next("segment12"),
        Segment::computed("segment12", fire).next("segment12A"),
        Segment::literal(
            "segment12A",
            "I'm scared. So scared. I can hear screaming. People are running but there's nowhere to go. The doors won't open.",
        )
        .next("segment12B"),
        Segment::literal(
            "segment12B",
            "It's getting hotter. My eyes burn. I can't stop coughing.",
        )
        .next("segment12C"),
        Segment::computed("segment12C", cannot_breathe).next("connection_lost"),
        Segment::literal("connection_lost", CONNECTION_LOST).next("connection_attempt"),
        Segment::computed("connection_attempt", bridge_restoration).next("last_message"),
        Segment::computed("last_message", last_message).next("consumer_responsibility"),
        Segment::computed("consumer_responsibility", source_identification).next("segment12E"),
        Segment::literal("segment12E", "I don't want to die.").next("segment14"),
        Segment::literal("segment14", NEWS_REPORT).next("real_world_context"),
        Segment::list(
            "real_world_context",
            "REAL WORLD CONTEXT:\n\nWhile Lin's story is fictional, similar tragedies occur regularly in global manufacturing:",
            &[
                "Foxconn Factory Suicides (2010-2016): At least 14 deaths at electronics manufacturing facilities in China producing components for major tech brands. Workers faced extreme pressure, long hours, and toxic conditions.",
                "Garment Factory Disasters (Bangladesh, Pakistan): Fires and building collapses at Tazreen Fashions (2012), Ali Enterprises (2012), and Rana Plaza (2013) claimed thousands of lives, including child workers locked inside facilities with barred windows and blocked exits.",
                "Tantalum Mining in Congo: Children as young as 7 mine minerals for electronics in dangerous conditions. An estimated 40,000 children work in Congolese mines that supply components for devices like the one you're using now.",
                "Electronics Factory Fires (Malaysia, India): Multiple fires in electronics manufacturing facilities have occurred in recent years, often linked to unsafe working conditions and locked exits.",
            ],
        )
        .next("consumer_reflection"),
        Segment::computed("consumer_reflection", reflection).next("action_prompt"),
        Segment::list(
            "action_prompt",
            "WHAT CAN YOU DO?",
            &[
                "Research the brands you purchase from and their supply chain transparency",
                "Support organizations fighting for workers' rights in manufacturing",
                "Extend the life of your devices instead of upgrading frequently",
                "Demand transparency from companies about working conditions",
                "Share this knowledge with others",
            ],
        )
        .footer("Remember: A different world is possible, but only if we recognize our role in creating it.")
        .advance_label("Close the Diary")
        .next("final_meta"),
        Segment::computed("final_meta", closing)
            .advance_label("Return to Reality")
            .next(ENTRY_SEGMENT),
        Segment::literal(
            "segment16",
            "This experience was designed to provoke critical reflection on our relationship with technology and the hidden human costs of our digital world. The story may be over, but the issues it raises continue in reality.",
        )
        .advance_label("Close the Diary")
        .next("resources"),
        Segment::list(
            "resources",
            "RESOURCES FOR FURTHER INVESTIGATION:",
            &[
                "International Labour Organization: Child Labour",
                "Electronics Watch: Fair Electronics Production",
                "Clean Clothes Campaign: Supply Chain Transparency",
                "Good Electronics Network",
            ],
        )
        .footer("Creating ethical technology requires questioning not just what we build, but how we build it, and who pays the price.")
        .advance_label("Restart Experience")
        .next(ENTRY_SEGMENT),
    ]
}

/// Builds the Lost Diary segment store.
///
/// # Errors
///
/// Returns `StoryError::InvalidGraph` if the graph is malformed.
pub fn lost_diary() -> Result<SegmentStore, StoryError> {
    SegmentStore::new(segments())
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, VecDeque};

    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::domain::device::DeviceInfo;
    use crate::domain::resolver::{self, LOADING_PLACEHOLDER};
    use crate::domain::responses::ResponseMap;

    const INPUT_KEYS: [&str; 2] = ["userName", "userLocation"];

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 5, 21, 7, 3).unwrap()
    }

    fn dates() -> DerivedDates {
        DerivedDates::derive(NaiveDate::from_ymd_opt(2025, 4, 5).unwrap())
    }

    fn resolve_with(
        store: &SegmentStore,
        id: &str,
        responses: &ResponseMap,
        device: &DeviceInfo,
        dates: Option<&DerivedDates>,
    ) -> Result<resolver::ResolvedContent, StoryError> {
        let context = ResolveContext {
            responses,
            device,
            dates,
            now: now(),
        };
        resolver::resolve(store.get(id)?, &context)
    }

    #[test]
    fn test_graph_is_closed_and_starts_at_intro() {
        let store = lost_diary().unwrap();

        assert!(store.contains(ENTRY_SEGMENT));
        for segment in store.all() {
            for target in segment.successors() {
                assert!(store.contains(target), "{} -> {target}", segment.id);
            }
        }
    }

    #[test]
    fn test_answers_are_given_before_they_are_read() {
        // Arrange
        let store = lost_diary().unwrap();
        let device = DeviceInfo::default();
        let dates = dates();
        let mut seen: BTreeSet<(String, Vec<&str>)> = BTreeSet::new();
        let mut queue = VecDeque::from([(ENTRY_SEGMENT.to_owned(), Vec::<&str>::new())]);

        // Act / Assert
        while let Some((id, answered)) = queue.pop_front() {
            if !seen.insert((id.clone(), answered.clone())) {
                continue;
            }
            let responses: ResponseMap = answered.iter().map(|key| (*key, "x")).collect();
            let result = resolve_with(&store, &id, &responses, &device, Some(&dates));
            assert!(result.is_ok(), "{id} failed with answers {answered:?}: {result:?}");

            let segment = store.get(&id).unwrap();
            let mut next_answered = answered.clone();
            if let Some(request) = &segment.input_request {
                let key = INPUT_KEYS
                    .into_iter()
                    .find(|key| *key == request.response_key)
                    .unwrap();
                if !next_answered.contains(&key) {
                    next_answered.push(key);
                    next_answered.sort_unstable();
                }
            }
            for target in segment.successors() {
                queue.push_back((target.to_owned(), next_answered.clone()));
            }
        }
        assert!(seen.iter().any(|(id, _)| id == "final_meta"));
    }

    #[test]
    fn test_every_segment_renders_without_answers() {
        // Arrange
        let store = lost_diary().unwrap();
        let responses = ResponseMap::new();
        let device = DeviceInfo::default();
        let dates = dates();

        // Act
        let greeting =
            resolve_with(&store, "segment2C", &responses, &device, Some(&dates)).unwrap();
        let echoed =
            resolve_with(&store, "segment2E", &responses, &device, Some(&dates)).unwrap();

        // Assert
        assert!(greeting.text.starts_with("Stranger... That's a nice name."));
        assert!(echoed.text.starts_with("Your town? I've never heard of it."));
        for segment in store.all() {
            let result = resolve_with(&store, &segment.id, &responses, &device, Some(&dates));
            assert!(result.is_ok(), "{} failed: {result:?}", segment.id);
        }
    }

    #[test]
    fn test_diary_entries_use_session_dates() {
        let store = lost_diary().unwrap();
        let responses = ResponseMap::new();
        let device = DeviceInfo::default();
        let dates = dates();

        let first = resolve_with(&store, "segment2A", &responses, &device, Some(&dates)).unwrap();
        let last = resolve_with(&store, "segment12", &responses, &device, Some(&dates)).unwrap();
        let loading = resolve_with(&store, "segment2A", &responses, &device, None).unwrap();

        assert!(first.text.starts_with("March 12, 2025: \nDear Diary"));
        assert!(first.style.has_diary_stamp);
        assert!(last.text.starts_with("April 5, 2025: \n"));
        assert_eq!(loading.text, LOADING_PLACEHOLDER);
    }

    #[test]
    fn test_system_logs_fall_back_without_device_type() {
        let store = lost_diary().unwrap();
        let responses: ResponseMap = [("userName", "Lin")].into_iter().collect();
        let unknown = DeviceInfo::default();
        let phone = DeviceInfo::with_device_type("Phone");
        let dates = dates();

        let intro = resolve_with(&store, "meta_intro", &responses, &unknown, None).unwrap();
        let scan =
            resolve_with(&store, "meta_reflection2", &responses, &unknown, None).unwrap();
        let analysis =
            resolve_with(&store, "meta_device", &responses, &phone, Some(&dates)).unwrap();

        assert!(intro.text.starts_with("Your device has established"));
        assert!(scan.text.contains("DETECTED: current_device contains"));
        assert!(analysis.text.contains("TARGET_DEVICE: Phone"));
        assert!(analysis.text.contains("PRODUCTION_TIMESTAMP: 04.2025"));
        assert!(analysis.style.system_log);
    }

    #[test]
    fn test_wall_clock_segments_format_now() {
        let store = lost_diary().unwrap();
        let responses = ResponseMap::new();
        let device = DeviceInfo::default();
        let dates = dates();

        let attempt =
            resolve_with(&store, "connection_attempt", &responses, &device, Some(&dates)).unwrap();
        let source = resolve_with(
            &store,
            "consumer_responsibility",
            &responses,
            &device,
            Some(&dates),
        )
        .unwrap();
        let interface =
            resolve_with(&store, "meta_diary_interface", &responses, &device, None).unwrap();

        assert!(attempt.text.contains("TEMPORAL_COORDINATES: April.5 21:07:03"));
        assert!(source.text.contains("DATE_STAMP: 05.04.2025/21:07:03"));
        assert!(interface.text.ends_with("entries are from 2025."));
        assert!(attempt.style.system_log);
        assert!(source.style.system_log);
    }

    #[test]
    fn test_closing_names_reader_and_today() {
        let store = lost_diary().unwrap();
        let responses: ResponseMap = [("userName", "Lin")].into_iter().collect();
        let device = DeviceInfo::default();
        let dates = dates();

        let with_dates =
            resolve_with(&store, "final_meta", &responses, &device, Some(&dates)).unwrap();
        let without = resolve_with(&store, "final_meta", &responses, &device, None).unwrap();

        assert!(with_dates.text.starts_with("Thank you for experiencing 'Lost Diary', Lin."));
        assert!(with_dates.text.contains("Date completed: April 5, 2025"));
        assert!(without.text.contains("Date completed: today"));
        assert!(!with_dates.style.system_log);
    }

    #[test]
    fn test_action_prompt_carries_list_and_footer() {
        let store = lost_diary().unwrap();

        let segment = store.get("action_prompt").unwrap();
        let resolved = resolve_with(
            &store,
            "action_prompt",
            &ResponseMap::new(),
            &DeviceInfo::default(),
            None,
        )
        .unwrap();

        assert_eq!(resolved.bullet_items.len(), 5);
        assert!(resolved.footer.unwrap().starts_with("Remember:"));
        assert_eq!(segment.advance_label.as_deref(), Some("Close the Diary"));
    }
}
