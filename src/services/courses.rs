//! Static course catalog backing the course pages and dashboards.

use serde::Serialize;

/// Learner progress on an enrolled course, or store listing for an available one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Listing {
    #[serde(rename_all = "camelCase")]
    Enrolled { progress: u8, last_accessed: String },
    Available { price: String, rating: f64, students: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub category: String,
    pub image: String,
    #[serde(flatten)]
    pub listing: Listing,
}

impl Course {
    #[must_use]
    pub fn is_enrolled(&self) -> bool {
        matches!(self.listing, Listing::Enrolled { .. })
    }
}

#[derive(Debug, Clone)]
pub struct CourseCatalog {
    courses: Vec<Course>,
}

impl CourseCatalog {
    #[must_use]
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    #[must_use]
    pub fn seeded() -> Self {
        const IMAGE: &str = "/placeholder.svg?height=200&width=400";
        let enrolled = [
            (1, "Introduction to React", "Learn the fundamentals of React and build your first application", "Sarah Johnson", "Web Development", 65, "2 days ago"),
            (2, "Advanced Python Programming", "Master Python with advanced concepts and real-world applications", "Michael Chen", "Programming", 32, "1 week ago"),
            (3, "Data Science Fundamentals", "Introduction to data analysis, visualization, and machine learning", "Emily Rodriguez", "Data Science", 78, "3 days ago"),
            (4, "UX/UI Design Principles", "Learn the core principles of user experience and interface design", "David Kim", "Design", 15, "5 days ago"),
        ];
        let available = [
            (5, "Machine Learning with TensorFlow", "Build intelligent applications with TensorFlow and Keras", "Alex Johnson", "Data Science", "$49.99", 4.8, 1245),
            (6, "Full-Stack Web Development", "Learn to build complete web applications from front to back", "Jessica Williams", "Web Development", "$59.99", 4.9, 2341),
            (7, "Mobile App Development with React Native", "Create cross-platform mobile apps with React Native", "Robert Chen", "Mobile Development", "$54.99", 4.7, 1876),
            (8, "Graphic Design Masterclass", "Master graphic design principles and tools", "Sophia Garcia", "Design", "$44.99", 4.6, 1532),
        ];

        let mut courses = Vec::with_capacity(enrolled.len() + available.len());
        for (id, title, description, instructor, category, progress, last_accessed) in enrolled {
            courses.push(Course {
                id,
                title: title.into(),
                description: description.into(),
                instructor: instructor.into(),
                category: category.into(),
                image: IMAGE.into(),
                listing: Listing::Enrolled { progress, last_accessed: last_accessed.into() },
            });
        }
        for (id, title, description, instructor, category, price, rating, students) in available {
            courses.push(Course {
                id,
                title: title.into(),
                description: description.into(),
                instructor: instructor.into(),
                category: category.into(),
                image: IMAGE.into(),
                listing: Listing::Available { price: price.into(), rating, students },
            });
        }
        Self::new(courses)
    }

    pub fn enrolled(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter().filter(|c| c.is_enrolled())
    }

    pub fn available(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter().filter(|c| !c.is_enrolled())
    }

    #[must_use]
    pub fn by_id(&self, id: u64) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Courses taught by the named instructor.
    pub fn taught_by<'a>(&'a self, instructor: &'a str) -> impl Iterator<Item = &'a Course> {
        self.courses.iter().filter(move |c| c.instructor == instructor)
    }
}

#[cfg(test)]
#[path = "courses_test.rs"]
mod tests;
