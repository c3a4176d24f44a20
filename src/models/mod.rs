pub mod exercise;
pub mod from_row;
pub mod session;
pub mod user;

pub use exercise::{
    CreateExercise, ExerciseDetail, ExerciseFilters, ExerciseType, MuscleGroup,
    MuscleGroupWithExercises,
};
pub use from_row::FromSqliteRow;
pub use session::{
    CreateSession, CreateSessionEntry, Session, SessionEntryWithExercise, SessionFilters,
    SessionWithEntries,
};
pub use user::{LoginCredentials, RegisterUser, User};
