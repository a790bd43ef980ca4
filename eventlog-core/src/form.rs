//! Event form schemas.
//!
//! Forms hold values the way input controls produce them (empty strings for
//! untouched optional fields, the success outcome as a string literal). Calling
//! `validate` runs the schema once and yields normalized [`EventValues`] ready
//! to be turned into a request body.

use chrono::{DateTime, Utc};

use crate::event::EventDetail;
use crate::photo::{PhotoCandidate, PhotoRules};
use crate::success::Success;
use crate::validation::{Checker, FieldPath, Violations, non_empty};

pub const TITLE_MAX: usize = 50;
pub const PLACE_MAX: usize = 100;
pub const URL_MAX: usize = 200;
pub const MEMBER_MAX: usize = 100;
pub const MEMO_MAX: usize = 255;
pub const DIARY_MAX: usize = 10000;

pub const TITLE_REQUIRED: &str = "イベントタイトルを入力してください";
pub const TITLE_TOO_LONG: &str = "イベントタイトルが長すぎます";
pub const TOO_LONG: &str = "文字数超過";
pub const END_BEFORE_START: &str = "終了日時は開始日時の後に設定してください";
pub const SUCCESS_INVALID: &str = "成功・失敗のいずれかを選択してください";

/// Field name of the photo slots in the edit form.
pub const EVENT_PHOTOS: &str = "eventPhotos";

/// Validated, normalized event fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EventValues {
    pub title: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: Option<DateTime<Utc>>,
    pub place: Option<String>,
    pub url: Option<String>,
    pub member: Option<String>,
    pub memo: Option<String>,
    pub diary: Option<String>,
    pub success: Success,
}

/// Fields of the "new event" dialog, also the `event` part of the edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct EventForm {
    pub title: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: Option<DateTime<Utc>>,
    pub place: Option<String>,
    pub url: Option<String>,
    pub member: Option<String>,
    pub memo: Option<String>,
}

impl EventForm {
    /// Blank form for an event starting at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        EventForm {
            title: String::new(),
            start_date_time: start,
            end_date_time: None,
            place: Some(String::new()),
            url: Some(String::new()),
            member: Some(String::new()),
            memo: Some(String::new()),
        }
    }

    pub fn validate(&self) -> Result<EventValues, Violations> {
        let mut checker = Checker::new();
        self.check_fields(&mut checker, "");
        self.check_range(&mut checker, "");
        checker.finish_with(|| self.values(None, Success::Unknown))
    }

    fn check_fields(&self, checker: &mut Checker, prefix: &str) {
        let title = FieldPath::nested(prefix, "title");
        checker.min_len(&title, &self.title, 1, TITLE_REQUIRED);
        checker.max_len(&title, Some(&self.title), TITLE_MAX, TITLE_TOO_LONG);

        let limits = [
            ("place", &self.place, PLACE_MAX),
            ("url", &self.url, URL_MAX),
            ("member", &self.member, MEMBER_MAX),
            ("memo", &self.memo, MEMO_MAX),
        ];
        for (name, value, max) in limits {
            checker.max_len(&FieldPath::nested(prefix, name), value.as_deref(), max, TOO_LONG);
        }
    }

    /// Cross-field rule, reported on `endDateTime` rather than on the form.
    fn check_range(&self, checker: &mut Checker, prefix: &str) {
        if let Some(end) = self.end_date_time {
            checker.ensure(
                self.start_date_time <= end,
                &FieldPath::nested(prefix, "endDateTime"),
                END_BEFORE_START,
            );
        }
    }

    fn values(&self, diary: Option<String>, success: Success) -> EventValues {
        EventValues {
            title: self.title.clone(),
            start_date_time: self.start_date_time,
            end_date_time: self.end_date_time,
            place: non_empty(self.place.as_deref()),
            url: non_empty(self.url.as_deref()),
            member: non_empty(self.member.as_deref()),
            memo: non_empty(self.memo.as_deref()),
            diary,
            success,
        }
    }
}

/// The "edit event" form: event fields, diary, outcome and photo slots.
#[derive(Debug, Clone, PartialEq)]
pub struct EditEventForm {
    pub event: EventForm,
    pub diary: Option<String>,
    /// `"true"`, `"false"` or nothing, as emitted by the outcome control
    pub success: Option<String>,
    /// One slot per photo input; `None` means no file was chosen.
    pub event_photos: Vec<Option<PhotoCandidate>>,
}

/// Output of a successful edit-form validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEdit {
    pub values: EventValues,
    /// Chosen files only, empty slots dropped
    pub photos: Vec<PhotoCandidate>,
}

impl EditEventForm {
    /// Default values for editing a stored event. Photo slots start empty.
    pub fn from_detail(detail: &EventDetail) -> Self {
        let event = &detail.event;
        EditEventForm {
            event: EventForm {
                title: event.title.clone(),
                start_date_time: event.start_date_time,
                end_date_time: event.end_date_time,
                place: event.place.clone(),
                url: event.url.clone(),
                member: event.member.clone(),
                memo: event.memo.clone(),
            },
            diary: event.diary.clone(),
            success: event.success.as_form_value().map(str::to_string),
            event_photos: vec![None],
        }
    }

    pub fn validate(&self) -> Result<ValidatedEdit, Violations> {
        self.validate_with(&PhotoRules::default())
    }

    pub fn validate_with(&self, rules: &PhotoRules) -> Result<ValidatedEdit, Violations> {
        let mut checker = Checker::new();

        self.event.check_fields(&mut checker, "event");
        checker.max_len(
            &FieldPath::nested("event", "diary"),
            self.diary.as_deref(),
            DIARY_MAX,
            TOO_LONG,
        );
        let success = Success::from_form_value(self.success.as_deref());
        checker.ensure(
            success.is_some(),
            &FieldPath::nested("event", "success"),
            SUCCESS_INVALID,
        );
        self.event.check_range(&mut checker, "event");

        let photos_path = FieldPath::new(EVENT_PHOTOS);
        for (i, photo) in self.event_photos.iter().enumerate() {
            if let Some(photo) = photo {
                rules.check(&mut checker, &photos_path.index(i), photo);
            }
        }

        checker.finish_with(|| ValidatedEdit {
            values: self.event.values(
                non_empty(self.diary.as_deref()),
                success.unwrap_or_default(),
            ),
            photos: self.event_photos.iter().flatten().cloned().collect(),
        })
    }
}
