//! Course document parser.
//!
//! Expected document shape:
//!
//! ```text
//! Course Title: Introduction to Machine Learning
//! Course Link: https://example.com/ml
//! Course Instructor: Dr. Jane Smith
//!
//! Lesson 0: Welcome
//! Lesson Link: https://example.com/ml/lesson-0
//! Free text of the lesson...
//!
//! Lesson 1: Supervised Learning
//! ...
//! ```
//!
//! Every metadata field is optional; the parser degrades instead of
//! failing on malformed input.

use std::path::Path;

use coursepilot_core::error::{CoursePilotError, Result};
use coursepilot_core::types::{Course, CourseChunk, Lesson};

use crate::chunker::chunk_text;

/// Parses raw course documents into a [`Course`] plus its content chunks.
pub struct DocumentProcessor {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl DocumentProcessor {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Read and parse one document file. Only unreadable files error;
    /// malformed content parses leniently.
    pub fn process_file(&self, path: &Path) -> Result<(Course, Vec<CourseChunk>)> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoursePilotError::Ingest(format!("Failed to read {}: {e}", path.display()))
        })?;
        let fallback_title = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled Course".to_string());
        Ok(self.process_text(&raw, &fallback_title))
    }

    /// Parse raw text. `fallback_title` is used when the document has no
    /// `Course Title:` header (typically the filename).
    pub fn process_text(&self, raw: &str, fallback_title: &str) -> (Course, Vec<CourseChunk>) {
        let lines: Vec<&str> = raw.lines().collect();

        // Header: prefixed metadata lines until the first lesson marker.
        let mut title = None;
        let mut course_link = None;
        let mut instructor = None;
        let mut body_start = lines.len();

        for (i, line) in lines.iter().enumerate() {
            if parse_lesson_marker(line).is_some() {
                body_start = i;
                break;
            }
            let line = line.trim();
            if let Some(v) = strip_field(line, "Course Title:") {
                title = Some(v);
            } else if let Some(v) = strip_field(line, "Course Link:") {
                course_link = Some(v);
            } else if let Some(v) = strip_field(line, "Course Instructor:") {
                instructor = Some(v);
            }
            body_start = i + 1;
        }

        let title = title.unwrap_or_else(|| fallback_title.to_string());
        let mut course = Course {
            title: title.clone(),
            course_link,
            instructor,
            lessons: Vec::new(),
        };

        // Lesson blocks: each starts at a `Lesson N: <title>` marker, may
        // carry a `Lesson Link:` on the following line, then free text.
        let mut blocks: Vec<(Option<u32>, Vec<String>)> = Vec::new();
        let mut current_text: Vec<String> = Vec::new();
        let mut current_lesson: Option<u32> = None;

        // Header documents without lesson markers: everything after the
        // header is one unnumbered block.
        if body_start >= lines.len() {
            let remainder: Vec<String> = lines
                .iter()
                .skip_while(|l| {
                    let t = l.trim();
                    t.starts_with("Course Title:")
                        || t.starts_with("Course Link:")
                        || t.starts_with("Course Instructor:")
                })
                .map(|l| l.to_string())
                .collect();
            if !remainder.join(" ").trim().is_empty() {
                blocks.push((None, remainder));
            }
        }

        let mut i = body_start;
        while i < lines.len() {
            let line = lines[i];
            if let Some((number, lesson_title)) = parse_lesson_marker(line) {
                if !current_text.is_empty() || current_lesson.is_some() {
                    blocks.push((current_lesson, std::mem::take(&mut current_text)));
                }
                current_lesson = Some(number);

                // Optional lesson link on the next non-empty line.
                let mut lesson_link = None;
                if let Some(next) = lines.get(i + 1)
                    && let Some(link) = strip_field(next.trim(), "Lesson Link:")
                {
                    lesson_link = Some(link);
                    i += 1;
                }

                course.lessons.push(Lesson {
                    lesson_number: number,
                    title: lesson_title,
                    lesson_link,
                });
            } else {
                current_text.push(line.to_string());
            }
            i += 1;
        }
        if !current_text.is_empty() || current_lesson.is_some() {
            blocks.push((current_lesson, current_text));
        }

        course.lessons.sort_by_key(|l| l.lesson_number);

        // Chunk each block, prefixing stored text with course/lesson
        // context to sharpen retrieval. Chunk indices run contiguously
        // across the whole course.
        let mut chunks = Vec::new();
        let mut chunk_index = 0usize;
        for (lesson_number, text_lines) in blocks {
            let text = text_lines.join("\n");
            for window in chunk_text(&text, self.chunk_size, self.chunk_overlap) {
                let content = match lesson_number {
                    Some(n) => format!("Course {title} Lesson {n} content: {window}"),
                    None => format!("Course {title} content: {window}"),
                };
                chunks.push(CourseChunk {
                    content,
                    course_title: title.clone(),
                    lesson_number,
                    chunk_index,
                });
                chunk_index += 1;
            }
        }

        tracing::debug!(
            "Parsed '{}': {} lesson(s), {} chunk(s)",
            course.title,
            course.lessons.len(),
            chunks.len()
        );
        (course, chunks)
    }
}

fn strip_field(line: &str, prefix: &str) -> Option<String> {
    let value = line.strip_prefix(prefix)?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Match `Lesson N: <title>` and return `(N, title)`.
fn parse_lesson_marker(line: &str) -> Option<(u32, String)> {
    let rest = line.trim().strip_prefix("Lesson ")?;
    let colon = rest.find(':')?;
    let number: u32 = rest[..colon].trim().parse().ok()?;
    let title = rest[colon + 1..].trim().to_string();
    if title.is_empty() {
        None
    } else {
        Some((number, title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Course Title: Introduction to Machine Learning
Course Link: https://example.com/ml
Course Instructor: Dr. Jane Smith

Lesson 0: Welcome
Lesson Link: https://example.com/ml/lesson-0
Machine learning is a subset of artificial intelligence. It learns from data.

Lesson 1: Supervised Learning
Supervised learning maps inputs to labels. Regression and classification are the two main tasks.
";

    fn processor() -> DocumentProcessor {
        DocumentProcessor::new(800, 100)
    }

    #[test]
    fn test_parse_full_header() {
        let (course, _) = processor().process_text(SAMPLE, "fallback");
        assert_eq!(course.title, "Introduction to Machine Learning");
        assert_eq!(course.course_link.as_deref(), Some("https://example.com/ml"));
        assert_eq!(course.instructor.as_deref(), Some("Dr. Jane Smith"));
    }

    #[test]
    fn test_parse_lessons_in_order() {
        let (course, _) = processor().process_text(SAMPLE, "fallback");
        assert_eq!(course.lessons.len(), 2);
        assert_eq!(course.lessons[0].lesson_number, 0);
        assert_eq!(course.lessons[0].title, "Welcome");
        assert_eq!(
            course.lessons[0].lesson_link.as_deref(),
            Some("https://example.com/ml/lesson-0")
        );
        assert_eq!(course.lessons[1].lesson_number, 1);
        assert!(course.lessons[1].lesson_link.is_none());
    }

    #[test]
    fn test_missing_title_falls_back_to_filename() {
        let raw = "Some text without any header.\nMore text here.";
        let (course, chunks) = processor().process_text(raw, "course3");
        assert_eq!(course.title, "course3");
        assert!(course.lessons.is_empty());
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].lesson_number.is_none());
        assert!(chunks[0].content.starts_with("Course course3 content:"));
    }

    #[test]
    fn test_chunks_reference_existing_lessons() {
        let (course, chunks) = processor().process_text(SAMPLE, "fallback");
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert_eq!(chunk.course_title, course.title);
            let n = chunk.lesson_number.expect("all sample chunks have lessons");
            assert!(course.lesson(n).is_some());
        }
    }

    #[test]
    fn test_chunk_indices_contiguous_from_zero() {
        // Small windows force several chunks per lesson.
        let processor = DocumentProcessor::new(60, 20);
        let (_, chunks) = processor.process_text(SAMPLE, "fallback");
        assert!(chunks.len() > 2);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i);
        }
    }

    #[test]
    fn test_chunk_count_matches_window_rule() {
        let (course, chunks) = processor().process_text(SAMPLE, "fallback");
        // Per-lesson window rule applied to each lesson's text.
        let lesson0_text = "Machine learning is a subset of artificial intelligence. It learns from data.";
        let lesson1_text = "Supervised learning maps inputs to labels. Regression and classification are the two main tasks.";
        let expected: usize = [lesson0_text, lesson1_text]
            .iter()
            .map(|t| crate::chunker::chunk_text(t, 800, 100).len())
            .sum();
        assert_eq!(chunks.len(), expected);
        assert_eq!(course.lessons.len(), 2);
    }

    #[test]
    fn test_chunk_content_is_prefixed_with_context() {
        let (_, chunks) = processor().process_text(SAMPLE, "fallback");
        assert!(chunks[0].content.starts_with(
            "Course Introduction to Machine Learning Lesson 0 content:"
        ));
    }

    #[test]
    fn test_empty_document_produces_no_chunks() {
        let (course, chunks) = processor().process_text("", "empty");
        assert_eq!(course.title, "empty");
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_malformed_lesson_marker_treated_as_text() {
        let raw = "\
Course Title: Broken Course

Lesson one: not a number
This text belongs to no lesson.";
        let (course, chunks) = processor().process_text(raw, "fallback");
        assert_eq!(course.title, "Broken Course");
        assert!(course.lessons.is_empty());
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].content.contains("not a number"));
    }

    #[test]
    fn test_process_file_missing_path_errors() {
        let err = processor()
            .process_file(Path::new("/nonexistent/course.txt"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
