//! Answer quality evaluation: judge contract and report types

mod judge;
mod report;

pub use judge::{
    parse_score, score_concurrently, Judge, JudgeDimension, JudgeInputs, JudgeParseError,
    JudgeScores,
};
pub use report::{round3, EvaluationReport, EvaluationRun, ScoreBand};

#[cfg(test)]
pub use judge::mock::MockJudge;
