//! AI prompt for junk pile measurement
//!
//! The prompt asks the model for raw observations only:
//! - A calibration anchor visible in the photo (door, trash can, person...)
//! - Bounding-box length/width/height of the pile in decimal feet
//! - A density factor describing how solidly the pile fills that box
//!
//! The model must not compute volume. Arithmetic happens in the domain
//! crate so that both models' answers can be compared on equal terms.
//! The JSON template uses placeholders rather than example numbers so the
//! model does not copy them back.

/// Reference objects the model may calibrate against, with typical sizes.
const CALIBRATION_ANCHORS: &[(&str, &str)] = &[
    ("interior door", "6.7 ft tall, 2.7 ft wide"),
    ("garage door", "7 ft tall, 8-9 ft wide per single bay"),
    ("standard trash can (96 gal)", "3.8 ft tall"),
    ("kitchen counter", "3 ft tall"),
    ("adult person", "about 5.5-6 ft tall"),
    ("queen mattress", "6.7 ft long, 5 ft wide"),
    ("brick", "8 in long"),
];

const JSON_TEMPLATE: &str = r#"{
  "anchor_used": "<name of the reference object you calibrated against>",
  "dimensions_ft": {
    "length": <number, decimal feet>,
    "width": <number, decimal feet>,
    "height": <number, decimal feet>
  },
  "density_factor": <number between 0.0 and 1.0>
}"#;

/// Build the fixed measurement prompt sent to both models.
pub fn build_measurement_prompt() -> String {
    let mut prompt = String::from(
        "You are measuring a pile of junk that a removal crew will haul away.\n\
         The photos all show the same pile, possibly from different angles.\n\n\
         ## Step 1: Calibrate\n\
         Find one object of known size near the pile and use it as your scale reference.\n\
         Typical sizes:\n",
    );

    for (name, size) in CALIBRATION_ANCHORS {
        prompt.push_str(&format!("- {}: {}\n", name, size));
    }

    prompt.push_str(
        "\n## Step 2: Measure the bounding box\n\
         Estimate the smallest box that contains the whole pile.\n\
         - length: longest horizontal extent, in decimal feet\n\
         - width: horizontal extent perpendicular to length, in decimal feet\n\
         - height: from the floor to the top of the pile, in decimal feet\n\n\
         ## Step 3: Density factor\n\
         Judge how much of that box is actually filled with material.\n\
         - 1.0: solid, tightly packed (stacked boxes, bagged debris)\n\
         - around 0.5: loose items with gaps (furniture, mixed household junk)\n\
         - near 0.0: mostly air (a single frame, sparse branches)\n\n\
         ## Rules\n\
         - Report raw observations only. Do NOT compute volume, cubic yards, or any \
         density-adjusted figure.\n\
         - Use plain numbers, not strings, and no units inside the numbers.\n\
         - If the images show several piles, measure them together as one box.\n\n\
         ## Output\n\
         Respond with JSON only, no prose and no markdown, in exactly this shape:\n",
    );
    prompt.push_str(JSON_TEMPLATE);
    prompt.push('\n');

    prompt
}
