//! Sample catalog written to an empty database on first start.

pub struct SeedActivity {
    pub name: &'static str,
    pub description: &'static str,
    pub schedule: &'static str,
    pub max_participants: i32,
    /// (email, display name) of the students already registered
    pub participants: [(&'static str, &'static str); 2],
}

pub const SEED_ACTIVITIES: [SeedActivity; 9] = [
    SeedActivity {
        name: "Chess Club",
        description: "Learn strategies and compete in chess tournaments",
        schedule: "Fridays, 3:30 PM - 5:00 PM",
        max_participants: 12,
        participants: [
            ("michael@mergington.edu", "Michael"),
            ("daniel@mergington.edu", "Daniel"),
        ],
    },
    SeedActivity {
        name: "Programming Class",
        description: "Learn programming fundamentals and build software projects",
        schedule: "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
        max_participants: 20,
        participants: [
            ("emma@mergington.edu", "Emma"),
            ("sophia@mergington.edu", "Sophia"),
        ],
    },
    SeedActivity {
        name: "Gym Class",
        description: "Physical education and sports activities",
        schedule: "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
        max_participants: 30,
        participants: [
            ("john@mergington.edu", "John"),
            ("olivia@mergington.edu", "Olivia"),
        ],
    },
    SeedActivity {
        name: "Soccer Team",
        description: "Join the school soccer team and compete in matches",
        schedule: "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
        max_participants: 22,
        participants: [
            ("liam@mergington.edu", "Liam"),
            ("noah@mergington.edu", "Noah"),
        ],
    },
    SeedActivity {
        name: "Basketball Team",
        description: "Practice and play basketball with the school team",
        schedule: "Wednesdays and Fridays, 3:30 PM - 5:00 PM",
        max_participants: 15,
        participants: [
            ("ava@mergington.edu", "Ava"),
            ("mia@mergington.edu", "Mia"),
        ],
    },
    SeedActivity {
        name: "Art Club",
        description: "Explore your creativity through painting and drawing",
        schedule: "Thursdays, 3:30 PM - 5:00 PM",
        max_participants: 15,
        participants: [
            ("amelia@mergington.edu", "Amelia"),
            ("harper@mergington.edu", "Harper"),
        ],
    },
    SeedActivity {
        name: "Drama Club",
        description: "Act, direct, and produce plays and performances",
        schedule: "Mondays and Wednesdays, 4:00 PM - 5:30 PM",
        max_participants: 20,
        participants: [
            ("ella@mergington.edu", "Ella"),
            ("scarlett@mergington.edu", "Scarlett"),
        ],
    },
    SeedActivity {
        name: "Math Club",
        description: "Solve challenging problems and participate in math competitions",
        schedule: "Tuesdays, 3:30 PM - 4:30 PM",
        max_participants: 10,
        participants: [
            ("james@mergington.edu", "James"),
            ("benjamin@mergington.edu", "Benjamin"),
        ],
    },
    SeedActivity {
        name: "Debate Team",
        description: "Develop public speaking and argumentation skills",
        schedule: "Fridays, 4:00 PM - 5:30 PM",
        max_participants: 12,
        participants: [
            ("charlotte@mergington.edu", "Charlotte"),
            ("henry@mergington.edu", "Henry"),
        ],
    },
];
