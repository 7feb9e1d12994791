//! Structured prompt for the satellite image verdict.

/// Prompt sent with each satellite image. Requests strict JSON; the parser
/// still tolerates prose around the object because models do not reliably
/// honor the instruction.
#[must_use]
pub fn analysis_prompt() -> String {
    concat!(
        "You are analyzing a satellite image for electrical infrastructure. ",
        "Determine whether the image shows an electrical substation. Look for: ",
        "rows of transformers, incoming/outgoing transmission lines, switching ",
        "equipment (busbars, circuit breakers), a small control building, and ",
        "perimeter security fencing around a gravel or paved yard.\n\n",
        "Respond with ONLY a JSON object, no other text, in exactly this shape:\n",
        "{\n",
        "  \"isSubstation\": boolean,\n",
        "  \"confidence\": number (0-100),\n",
        "  \"hasTransformers\": boolean,\n",
        "  \"hasTransmissionLines\": boolean,\n",
        "  \"hasSwitchingEquipment\": boolean,\n",
        "  \"hasControlBuilding\": boolean,\n",
        "  \"hasSecurityFencing\": boolean,\n",
        "  \"voltageIndicators\": [string],\n",
        "  \"reasoning\": string\n",
        "}"
    )
    .to_owned()
}
