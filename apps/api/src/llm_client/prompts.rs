// Cross-cutting prompt fragments shared by every completion request.
// Section-specific templates live in report::prompts.

/// Persona sent as the system message unless `SYSTEM_PROMPT` overrides it.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an experienced personality psychologist \
    who writes warm, precise Big Five assessment reports for individual clients. \
    You explain scores in plain language, never diagnose, and always ground your \
    observations in the scores you are given.";

/// Tone instruction appended to every report section prompt.
pub const TONE_INSTRUCTION: &str = "Summary Generation Tone: the generated text should be \
    uplifting and leave the reader feeling understood and satisfied";

/// Instruction that pins the response to a single JSON object.
pub const JSON_OUTPUT_INSTRUCTION: &str = "Respond with a single valid JSON object in exactly \
    the shape shown under 'OUTPUT JSON FORMAT'. Do not add commentary outside the JSON.";
