//! Static resume content and the HTML page built from it.
//!
//! The records here are pure configuration data: plain immutable structs
//! with serde derives so an alternate resume can be loaded from JSON.
//! The page is assembled by plain string building; there is deliberately
//! no templating engine.

use serde::{Deserialize, Serialize};

use crate::dom::Region;

/// Selector of the capture region inside the rendered page
pub const REGION_SELECTOR: &str = "#resume";

/// A single position in the experience section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub title: String,
    pub company: String,
    pub location: String,
    pub period: String,
    pub description: String,
}

/// A single entry in the education section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub school: String,
    pub degree: String,
    pub period: String,
    pub details: String,
}

/// Proficiency tier shown next to each skill chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Expert,
    Advanced,
    Intermediate,
    Basic,
}

impl SkillLevel {
    /// CSS class carrying the tier color
    pub fn class(self) -> &'static str {
        match self {
            SkillLevel::Expert => "level-expert",
            SkillLevel::Advanced => "level-advanced",
            SkillLevel::Intermediate => "level-intermediate",
            SkillLevel::Basic => "level-basic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SkillLevel::Expert => "Expert",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Basic => "Basic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: SkillLevel,
}

/// The whole resume: contact block plus the three content sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub jobs: Vec<Job>,
    pub schools: Vec<School>,
    pub skills: Vec<Skill>,
}

impl Profile {
    /// The built-in resume shipped with the binary.
    pub fn builtin() -> Self {
        Self {
            name: "Alexander Thompson".to_string(),
            email: "alex.thompson@techleader.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            location: "San Francisco, CA".to_string(),
            summary: "Innovative Tech Leader with 8+ years of experience in software \
                      development and team leadership. Proven track record of delivering \
                      high-impact projects at scale while mentoring engineering teams. \
                      Passionate about cloud architecture, distributed systems, and \
                      creating efficient, scalable solutions that drive business growth."
                .to_string(),
            jobs: vec![
                Job {
                    title: "Senior Engineering Manager".to_string(),
                    company: "TechGiant Inc.".to_string(),
                    location: "San Francisco, CA".to_string(),
                    period: "Dec 2019 - Present".to_string(),
                    description: "Leading a team of 25+ engineers across multiple product \
                                  lines. Architected and launched company's flagship cloud \
                                  platform, resulting in 200% revenue growth. Implemented \
                                  agile methodologies that reduced deployment time by 60%."
                        .to_string(),
                },
                Job {
                    title: "Lead Software Engineer".to_string(),
                    company: "InnovateTech Solutions".to_string(),
                    location: "Mountain View, CA".to_string(),
                    period: "Feb 2017 - Dec 2020".to_string(),
                    description: "Spearheaded development of microservices architecture \
                                  serving 1M+ users. Mentored junior developers and \
                                  established best practices for code quality and testing. \
                                  Reduced system downtime by 99.9%."
                        .to_string(),
                },
                Job {
                    title: "Full Stack Developer".to_string(),
                    company: "StartupRocket".to_string(),
                    location: "Palo Alto, CA".to_string(),
                    period: "May 2016 - Feb 2017".to_string(),
                    description: "Early employee at fast-growing startup. Built and deployed \
                                  critical features for the main product. Implemented \
                                  real-time analytics dashboard used by 50K+ customers."
                        .to_string(),
                },
            ],
            schools: vec![
                School {
                    school: "Stanford University".to_string(),
                    degree: "Master of Science in Computer Science".to_string(),
                    period: "Aug 2014 - May 2016".to_string(),
                    details: "Specialized in Artificial Intelligence and Distributed \
                              Systems. Research assistant in Cloud Computing Lab."
                        .to_string(),
                },
                School {
                    school: "University of California, Berkeley".to_string(),
                    degree: "Bachelor of Science in Computer Science & Engineering".to_string(),
                    period: "Aug 2010 - Apr 2014".to_string(),
                    details: "Dean's List all semesters. Led the Software Engineering Club. \
                              Completed honors thesis in distributed systems."
                        .to_string(),
                },
            ],
            skills: vec![
                Skill {
                    name: "System Architecture".to_string(),
                    level: SkillLevel::Expert,
                },
                Skill {
                    name: "Cloud Computing (AWS, GCP)".to_string(),
                    level: SkillLevel::Expert,
                },
                Skill {
                    name: "Kubernetes".to_string(),
                    level: SkillLevel::Advanced,
                },
                Skill {
                    name: "Node.js/TypeScript".to_string(),
                    level: SkillLevel::Expert,
                },
                Skill {
                    name: "React/Next.js".to_string(),
                    level: SkillLevel::Advanced,
                },
                Skill {
                    name: "Python".to_string(),
                    level: SkillLevel::Intermediate,
                },
                Skill {
                    name: "Team Leadership".to_string(),
                    level: SkillLevel::Basic,
                },
                Skill {
                    name: "Agile Methodologies".to_string(),
                    level: SkillLevel::Expert,
                },
                Skill {
                    name: "System Design".to_string(),
                    level: SkillLevel::Advanced,
                },
            ],
        }
    }
}

/// Escape text content for inclusion in the page.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// The page stylesheet. Colors are declared through cascading class rules
/// on purpose: the normalization pass resolves them to direct values before
/// rasterization, the same way the original page resolved utility classes.
const PAGE_STYLE: &str = "\
body { color: #111827; background-color: #ffffff; }\n\
#resume { background-color: #ffffff; }\n\
h1 { color: #9ca3af; }\n\
h2 { color: #9ca3af; }\n\
h3 { color: #9ca3af; }\n\
.muted { color: #6b7280; }\n\
.accent { color: #3b82f6; }\n\
.entry { border-color: #3b82f6; }\n\
.chip { background-color: #f3f4f6; color: #6b7280; }\n\
.level-expert { color: #22c55e; }\n\
.level-advanced { color: #3b82f6; }\n\
.level-intermediate { color: #f97316; }\n\
.level-basic { color: #6b7280; }\n";

/// Render the full resume page for the given profile.
pub fn page_html(profile: &Profile) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<html><head><title>");
    html.push_str(&escape(&profile.name));
    html.push_str(" - Resume</title><style>");
    html.push_str(PAGE_STYLE);
    html.push_str("</style></head><body>");
    html.push_str("<div id=\"resume\">");

    // Header
    html.push_str(&format!("<h1>{}</h1>", escape(&profile.name)));
    html.push_str(&format!(
        "<p class=\"muted\">{} | {} | {}</p>",
        escape(&profile.email),
        escape(&profile.phone),
        escape(&profile.location)
    ));
    html.push_str(&format!("<p class=\"muted\">{}</p>", escape(&profile.summary)));

    // Experience
    html.push_str("<h2>Professional Experience</h2>");
    for job in &profile.jobs {
        html.push_str("<div class=\"entry\">");
        html.push_str(&format!("<h3>{}</h3>", escape(&job.title)));
        html.push_str(&format!("<div class=\"accent\">{}</div>", escape(&job.company)));
        html.push_str(&format!(
            "<div class=\"muted\">{} | {}</div>",
            escape(&job.location),
            escape(&job.period)
        ));
        html.push_str(&format!("<p class=\"muted\">{}</p>", escape(&job.description)));
        html.push_str("</div>");
    }

    // Education
    html.push_str("<h2>Education</h2>");
    for school in &profile.schools {
        html.push_str("<div class=\"entry\">");
        html.push_str(&format!("<h3>{}</h3>", escape(&school.school)));
        html.push_str(&format!("<div class=\"accent\">{}</div>", escape(&school.degree)));
        html.push_str(&format!("<div class=\"muted\">{}</div>", escape(&school.period)));
        html.push_str(&format!("<p class=\"muted\">{}</p>", escape(&school.details)));
        html.push_str("</div>");
    }

    // Skills
    html.push_str("<h2>Skills &amp; Expertise</h2>");
    html.push_str("<div class=\"chips\">");
    for skill in &profile.skills {
        html.push_str(&format!(
            "<span class=\"chip {}\">{} - {}</span>",
            skill.level.class(),
            escape(&skill.name),
            skill.level.label()
        ));
    }
    html.push_str("</div>");

    html.push_str("</div></body></html>");
    html
}

/// Build the Capture Region for a rendered profile page.
pub fn resume_region(profile: &Profile) -> Region {
    Region::new(page_html(profile), REGION_SELECTOR)
}
