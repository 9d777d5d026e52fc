// Test fixtures with known texts
// WHY: Property checks need realistic prose with abbreviations, numbers and dialog

#![allow(dead_code)]

/// Plain prose with clear boundaries
pub const SIMPLE_TEXT: &str = "Hello world. This is a test. How are you?";

/// Multi-paragraph text with abbreviations, quotes and Unicode
pub const COMPLEX_TEXT: &str = r#"Dr. Smith went to the market yesterday morning. He bought apples, pears and a small melon.

"I am fine," she said. Then she walked away without another word.

The meeting was moved to 3 p.m. on Friday... Nobody was happy about it!
Final sentence with émojis and Unicode 世界. 一緒に行きましょう。それでいい？"#;

/// Long clause without any punctuation, as a model might stream it
pub const RUN_ON_TEXT: &str =
    "so we kept walking along the river and the sun kept going down and nobody said anything for a very long time";

/// Text that mixes links and emojis into prose
pub const NOISY_TEXT: &str =
    "Read the docs at https://docs.example.com/guide today 🚀. They explain everything you need 👍 in detail.";

/// Small corpus for training a punkt model
pub const TRAINING_CORPUS: &str = "Dr. Brown arrived early. The patient was waiting. \
Dr. Brown examined him carefully. The results came back on Monday. \
Prof. Green wrote the report. The report was long. \
Prof. Green signed it. The committee approved it. \
Mr. White paid the bill. The clinic closed at noon. \
Mr. White went home. The day was over.";
