//! Built-in problem catalog.
//!
//! Seeded into the `problems` collection the first time the problem actor
//! finds it empty. Stable ids keep usage records meaningful across restarts.

use super::model::{CodingProblem, Difficulty, ProblemExample};

fn example(input: &str, output: &str, explanation: Option<&str>) -> ProblemExample {
    ProblemExample {
        input: input.to_string(),
        output: output.to_string(),
        explanation: explanation.map(|e| e.to_string()),
    }
}

/// Returns the built-in seed catalog.
pub fn seed_catalog() -> Vec<CodingProblem> {
    vec![
        CodingProblem {
            id: "two-sum".to_string(),
            title: "Two Sum".to_string(),
            description: "Given an array of integers and a target value, return the indices of \
                          the two numbers that add up to the target. Each input has exactly one \
                          solution, and you may not use the same element twice."
                .to_string(),
            difficulty: Difficulty::Easy,
            category: vec!["arrays".to_string(), "hash-tables".to_string()],
            examples: vec![example(
                "nums = [2, 7, 11, 15], target = 9",
                "[0, 1]",
                Some("nums[0] + nums[1] == 9"),
            )],
            expected_time_complexity: "O(n)".to_string(),
            expected_space_complexity: "O(n)".to_string(),
            constraints: vec!["2 <= nums.length <= 10^4".to_string()],
            generated: false,
        },
        CodingProblem {
            id: "reverse-string".to_string(),
            title: "Reverse String".to_string(),
            description: "Reverse a string in place. The input is given as an array of \
                          characters; modify it without allocating a second array."
                .to_string(),
            difficulty: Difficulty::Easy,
            category: vec!["strings".to_string(), "two-pointers".to_string()],
            examples: vec![example("s = ['h','e','l','l','o']", "['o','l','l','e','h']", None)],
            expected_time_complexity: "O(n)".to_string(),
            expected_space_complexity: "O(1)".to_string(),
            constraints: vec!["1 <= s.length <= 10^5".to_string()],
            generated: false,
        },
        CodingProblem {
            id: "valid-parentheses".to_string(),
            title: "Valid Parentheses".to_string(),
            description: "Given a string containing only '(', ')', '{', '}', '[' and ']', \
                          determine whether the brackets are balanced and correctly nested."
                .to_string(),
            difficulty: Difficulty::Easy,
            category: vec!["strings".to_string(), "stacks".to_string()],
            examples: vec![
                example("s = \"()[]{}\"", "true", None),
                example("s = \"(]\"", "false", None),
            ],
            expected_time_complexity: "O(n)".to_string(),
            expected_space_complexity: "O(n)".to_string(),
            constraints: vec!["1 <= s.length <= 10^4".to_string()],
            generated: false,
        },
        CodingProblem {
            id: "climbing-stairs".to_string(),
            title: "Climbing Stairs".to_string(),
            description: "You are climbing a staircase with n steps. Each move you may climb 1 \
                          or 2 steps. In how many distinct ways can you reach the top?"
                .to_string(),
            difficulty: Difficulty::Easy,
            category: vec!["dynamic-programming".to_string(), "math".to_string()],
            examples: vec![example("n = 3", "3", Some("1+1+1, 1+2, 2+1"))],
            expected_time_complexity: "O(n)".to_string(),
            expected_space_complexity: "O(1)".to_string(),
            constraints: vec!["1 <= n <= 45".to_string()],
            generated: false,
        },
        CodingProblem {
            id: "merge-intervals".to_string(),
            title: "Merge Intervals".to_string(),
            description: "Given a collection of intervals, merge all overlapping intervals and \
                          return the non-overlapping result sorted by start."
                .to_string(),
            difficulty: Difficulty::Medium,
            category: vec!["arrays".to_string(), "sorting".to_string()],
            examples: vec![example(
                "intervals = [[1,3],[2,6],[8,10],[15,18]]",
                "[[1,6],[8,10],[15,18]]",
                Some("[1,3] and [2,6] overlap"),
            )],
            expected_time_complexity: "O(n log n)".to_string(),
            expected_space_complexity: "O(n)".to_string(),
            constraints: vec!["1 <= intervals.length <= 10^4".to_string()],
            generated: false,
        },
        CodingProblem {
            id: "longest-substring".to_string(),
            title: "Longest Substring Without Repeating Characters".to_string(),
            description: "Given a string, find the length of the longest substring without \
                          repeating characters."
                .to_string(),
            difficulty: Difficulty::Medium,
            category: vec!["strings".to_string(), "sliding-window".to_string(), "hash-tables".to_string()],
            examples: vec![example("s = \"abcabcbb\"", "3", Some("\"abc\" has length 3"))],
            expected_time_complexity: "O(n)".to_string(),
            expected_space_complexity: "O(min(n, m))".to_string(),
            constraints: vec!["0 <= s.length <= 5 * 10^4".to_string()],
            generated: false,
        },
        CodingProblem {
            id: "course-schedule".to_string(),
            title: "Course Schedule".to_string(),
            description: "There are numCourses courses labeled 0..numCourses-1 and a list of \
                          prerequisite pairs. Determine whether you can finish all courses \
                          (i.e. the prerequisite graph has no cycle)."
                .to_string(),
            difficulty: Difficulty::Medium,
            category: vec!["graphs".to_string(), "topological-sort".to_string()],
            examples: vec![example(
                "numCourses = 2, prerequisites = [[1,0]]",
                "true",
                Some("take 0, then 1"),
            )],
            expected_time_complexity: "O(V + E)".to_string(),
            expected_space_complexity: "O(V + E)".to_string(),
            constraints: vec!["1 <= numCourses <= 2000".to_string()],
            generated: false,
        },
        CodingProblem {
            id: "lru-cache".to_string(),
            title: "LRU Cache".to_string(),
            description: "Design a data structure for a least-recently-used cache supporting \
                          get and put in O(1) average time, evicting the least recently used \
                          entry when capacity is exceeded."
                .to_string(),
            difficulty: Difficulty::Hard,
            category: vec!["design".to_string(), "hash-tables".to_string(), "linked-lists".to_string()],
            examples: vec![example(
                "put(1,1), put(2,2), get(1), put(3,3), get(2)",
                "get(1) = 1, get(2) = -1",
                Some("put(3,3) evicted key 2"),
            )],
            expected_time_complexity: "O(1)".to_string(),
            expected_space_complexity: "O(capacity)".to_string(),
            constraints: vec!["1 <= capacity <= 3000".to_string()],
            generated: false,
        },
        CodingProblem {
            id: "median-sorted-arrays".to_string(),
            title: "Median of Two Sorted Arrays".to_string(),
            description: "Given two sorted arrays, return the median of the combined order \
                          without fully merging them."
                .to_string(),
            difficulty: Difficulty::Hard,
            category: vec!["arrays".to_string(), "binary-search".to_string(), "divide-and-conquer".to_string()],
            examples: vec![example("nums1 = [1,3], nums2 = [2]", "2.0", None)],
            expected_time_complexity: "O(log(m+n))".to_string(),
            expected_space_complexity: "O(1)".to_string(),
            constraints: vec!["0 <= m, n <= 1000".to_string()],
            generated: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_has_unique_ids() {
        let catalog = seed_catalog();
        let mut ids: Vec<_> = catalog.iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_seed_covers_every_difficulty() {
        let catalog = seed_catalog();
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert!(
                catalog.iter().any(|p| p.difficulty == difficulty),
                "no seed problem with difficulty {:?}",
                difficulty
            );
        }
    }

    #[test]
    fn test_seed_problems_are_tagged() {
        for p in seed_catalog() {
            assert!(!p.category.is_empty(), "{} has no category tags", p.id);
            assert!(!p.expected_time_complexity.is_empty());
        }
    }
}
