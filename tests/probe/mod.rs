/*!
Probe engine tests.

Real HTTP client behaviour, strategy selection, response inspection, scoring
rules, single-attempt probing, per-instance fallback evaluation and fleet
ranking.
*/

pub mod client_tests;
pub mod parsing_tests;
pub mod prober_tests;
pub mod url_tests;
