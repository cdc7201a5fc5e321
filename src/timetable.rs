/*
Implements:
 - reading a university timetable (groups, teachers, classrooms, subjects, lessons) from JSON
 - expansion of lessons into unit-length occurrences and the corresponding conflict graph
 - export and display of a schedule (coloring of the occurrences)
*/
use std::collections::HashMap;
use std::fs;

use serde::{Serialize, Deserialize};

use crate::color::{nb_colors, VertexId};
use crate::compact_instance::CompactInstance;
use crate::error::ColorError;

/// student group
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Group {
    /// identifier referenced by lessons
    pub id: String,
    /// display name
    pub name: String,
    /// number of students
    #[serde(default)]
    pub students: usize,
}

/// teacher
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Teacher {
    /// identifier referenced by lessons
    pub id: String,
    /// display name
    pub name: String,
    /// department
    #[serde(default)]
    pub department: String,
}

/// classroom
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Classroom {
    /// identifier referenced by lessons
    pub id: String,
    /// display name
    pub name: String,
    /// number of seats
    #[serde(default)]
    pub capacity: usize,
    /// kind of room
    #[serde(default = "default_lesson_type")]
    pub room_type: String,
}

/// subject
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subject {
    /// identifier referenced by lessons
    pub id: String,
    /// display name
    pub name: String,
    /// hours in the curriculum
    #[serde(default)]
    pub hours: usize,
}

/// groups attending a lesson (a single id or a list in the JSON file)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupList {
    /// single group
    One(String),
    /// several groups
    Many(Vec<String>),
}

impl GroupList {
    /// group ids
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            GroupList::One(g) => vec![g.clone()],
            GroupList::Many(l) => l.clone(),
        }
    }
}

/// lesson as written in the timetable file (repeated hours_per_week times)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LessonRecord {
    /// identifier
    pub id: String,
    /// subject id
    pub subject: String,
    /// lecture, practice, lab...
    #[serde(rename="type", default = "default_lesson_type")]
    pub lesson_type: String,
    /// attending groups
    pub groups: GroupList,
    /// teacher id
    pub teacher: String,
    /// classroom id
    pub classroom: String,
    /// number of occurrences per week
    #[serde(default = "default_hours_per_week")]
    pub hours_per_week: usize,
}

fn default_lesson_type() -> String { "lecture".to_string() }

fn default_hours_per_week() -> usize { 1 }

/** content of a timetable JSON file */
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimetableFile {
    /// student groups
    #[serde(default)]
    pub groups: Vec<Group>,
    /// teachers
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    /// classrooms
    #[serde(default)]
    pub classrooms: Vec<Classroom>,
    /// subjects
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// lessons
    #[serde(default)]
    pub lessons: Vec<LessonRecord>,
}

/** unit-length occurrence of a lesson (one vertex of the conflict graph) */
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lesson {
    /// occurrence id ("{lesson id}_{instance}")
    pub id: String,
    /// subject id
    pub subject: String,
    /// lecture, practice, lab...
    pub lesson_type: String,
    /// attending groups
    pub groups: Vec<String>,
    /// teacher id
    pub teacher: String,
    /// classroom id
    pub classroom: String,
    /// occurrences per week of the original lesson
    pub hours_per_week: usize,
    /// index of the occurrence (0..hours_per_week)
    pub instance: usize,
}

impl Lesson {
    /// true iff both occurrences share a group, the teacher or the classroom
    pub fn conflicts_with(&self, other:&Lesson) -> bool {
        if self.id == other.id && self.instance == other.instance {
            return false;
        }
        self.groups.iter().any(|g| other.groups.contains(g))
            || self.teacher == other.teacher
            || self.classroom == other.classroom
    }
}

/** repeats each lesson hours_per_week times */
pub fn expand_lessons(records:&[LessonRecord]) -> Vec<Lesson> {
    let mut res = Vec::with_capacity(records.iter().map(|l| l.hours_per_week).sum());
    for record in records {
        for i in 0..record.hours_per_week {
            res.push(Lesson {
                id: format!("{}_{}", record.id, i),
                subject: record.subject.clone(),
                lesson_type: record.lesson_type.clone(),
                groups: record.groups.to_vec(),
                teacher: record.teacher.clone(),
                classroom: record.classroom.clone(),
                hours_per_week: record.hours_per_week,
                instance: i,
            });
        }
    }
    res
}

/// one line of an exported schedule
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// occurrence id
    pub lesson_id: String,
    /// subject name
    pub subject: String,
    /// lecture, practice, lab...
    #[serde(rename="type")]
    pub lesson_type: String,
    /// group names
    pub groups: Vec<String>,
    /// teacher name
    pub teacher: String,
    /// classroom name
    pub classroom: String,
    /// slot assigned
    pub time_slot: usize,
}

/// exported schedule
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Schedule {
    /// number of slots used
    pub num_colors: usize,
    /// one entry per occurrence
    pub schedule: Vec<ScheduleEntry>,
}

/// weekdays of the slot labels (five periods a day, three on Saturday)
const DAYS:[(&str, usize) ; 6] = [("Mon", 5), ("Tue", 5), ("Wed", 5), ("Thu", 5), ("Fri", 5), ("Sat", 3)];

/** human readable label of a slot ("Mon 1" ... "Sat 3", then "Slot {s+1}") */
pub fn slot_label(slot:usize) -> String {
    let mut first = 0;
    for (day, nb_periods) in DAYS.iter() {
        if slot < first + nb_periods {
            return format!("{} {}", day, slot - first + 1);
        }
        first += nb_periods;
    }
    format!("Slot {}", slot + 1)
}

/** timetable: named entities indexed by id, and the expanded lesson occurrences */
#[derive(Clone, Debug)]
pub struct Timetable {
    /// groups by id
    groups: HashMap<String, Group>,
    /// teachers by id
    teachers: HashMap<String, Teacher>,
    /// classrooms by id
    classrooms: HashMap<String, Classroom>,
    /// subjects by id
    subjects: HashMap<String, Subject>,
    /// lesson occurrences (vertex i is lessons[i])
    lessons: Vec<Lesson>,
}

impl Timetable {
    /** builds a timetable from the content of a file. Fails if it has no lessons. */
    pub fn new(file:TimetableFile) -> Result<Self, ColorError> {
        let lessons = expand_lessons(&file.lessons);
        if lessons.is_empty() {
            return Err(ColorError::NoLessons);
        }
        Ok(Self {
            groups: file.groups.into_iter().map(|g| (g.id.clone(), g)).collect(),
            teachers: file.teachers.into_iter().map(|t| (t.id.clone(), t)).collect(),
            classrooms: file.classrooms.into_iter().map(|c| (c.id.clone(), c)).collect(),
            subjects: file.subjects.into_iter().map(|s| (s.id.clone(), s)).collect(),
            lessons,
        })
    }

    /** reads a timetable JSON file */
    pub fn from_file(filename:&str) -> Result<Self, ColorError> {
        let content = fs::read_to_string(filename)
            .map_err(|e| ColorError::io(filename, e))?;
        Self::from_json_str(&content)
    }

    /** reads a timetable from a JSON string */
    pub fn from_json_str(content:&str) -> Result<Self, ColorError> {
        let file:TimetableFile = serde_json::from_str(content)?;
        Self::new(file)
    }

    /// lesson occurrences
    pub fn lessons(&self) -> &[Lesson] { &self.lessons }

    /// number of groups, teachers, classrooms, subjects
    pub fn nb_entities(&self) -> (usize, usize, usize, usize) {
        (self.groups.len(), self.teachers.len(), self.classrooms.len(), self.subjects.len())
    }

    /** conflict graph over the occurrences (vertex i is lessons()[i]) */
    pub fn conflict_graph(&self) -> CompactInstance {
        let n = self.lessons.len();
        let mut adj_list:Vec<Vec<VertexId>> = vec![vec![] ; n];
        for i in 0..n {
            for j in i+1..n {
                if self.lessons[i].conflicts_with(&self.lessons[j]) {
                    adj_list[i].push(j);
                    adj_list[j].push(i);
                }
            }
        }
        CompactInstance::new(adj_list)
    }

    fn subject_name(&self, id:&str) -> String {
        self.subjects.get(id).map_or_else(|| id.to_string(), |s| s.name.clone())
    }

    fn group_name(&self, id:&str) -> String {
        self.groups.get(id).map_or_else(|| id.to_string(), |g| g.name.clone())
    }

    fn teacher_name(&self, id:&str) -> String {
        self.teachers.get(id).map_or_else(|| id.to_string(), |t| t.name.clone())
    }

    fn classroom_name(&self, id:&str) -> String {
        self.classrooms.get(id).map_or_else(|| id.to_string(), |c| c.name.clone())
    }

    fn check_size(&self, coloring:&[usize]) -> Result<(), ColorError> {
        if coloring.len() != self.lessons.len() {
            return Err(ColorError::ColoringSize(coloring.len(), self.lessons.len()));
        }
        Ok(())
    }

    /** builds the schedule of a coloring (names resolved when known) */
    pub fn to_schedule(&self, coloring:&[usize]) -> Result<Schedule, ColorError> {
        self.check_size(coloring)?;
        let schedule = self.lessons.iter().zip(coloring.iter()).map(|(lesson, slot)| {
            ScheduleEntry {
                lesson_id: lesson.id.clone(),
                subject: self.subject_name(&lesson.subject),
                lesson_type: lesson.lesson_type.clone(),
                groups: lesson.groups.iter().map(|g| self.group_name(g)).collect(),
                teacher: self.teacher_name(&lesson.teacher),
                classroom: self.classroom_name(&lesson.classroom),
                time_slot: *slot,
            }
        }).collect();
        Ok(Schedule { num_colors: nb_colors(coloring), schedule })
    }

    /** writes the schedule of a coloring as JSON */
    pub fn write_schedule(&self, filename:&str, coloring:&[usize]) -> Result<(), ColorError> {
        let schedule = self.to_schedule(coloring)?;
        let content = serde_json::to_string_pretty(&schedule)?;
        fs::write(filename, content).map_err(|e| ColorError::io(filename, e))
    }

    /** renders the schedule grouped by slot */
    pub fn render_schedule(&self, coloring:&[usize], algo_name:&str) -> Result<String, ColorError> {
        self.check_size(coloring)?;
        let mut slots:Vec<Vec<VertexId>> = vec![vec![] ; nb_colors(coloring)];
        for (i,slot) in coloring.iter().enumerate() {
            slots[*slot].push(i);
        }
        let mut res = format!("{} - slots used: {}\n", algo_name, nb_colors(coloring));
        for (slot, lessons) in slots.iter().enumerate().filter(|(_,l)| !l.is_empty()) {
            res += format!("\n{}:\n", slot_label(slot)).as_str();
            for i in lessons {
                let lesson = &self.lessons[*i];
                let groups:Vec<String> = lesson.groups.iter().map(|g| self.group_name(g)).collect();
                res += format!(
                    "  [{}] {} [{}] | Groups: {} | {} | {}\n",
                    i,
                    self.subject_name(&lesson.subject),
                    lesson.lesson_type,
                    groups.join(", "),
                    self.teacher_name(&lesson.teacher),
                    self.classroom_name(&lesson.classroom),
                ).as_str();
            }
        }
        Ok(res)
    }
}
